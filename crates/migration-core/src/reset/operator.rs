use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Mutex;

/// Interacción con el operador humano (stdout/stdin en producción).
pub trait Operator: Send + Sync {
    fn say(&self, line: &str);

    fn warn(&self, line: &str);

    /// Pide un número de paso; una línea vacía acepta `default`.
    fn ask_step(&self, prompt: &str, default: usize) -> io::Result<usize>;

    /// Pregunta sí/no; por defecto "no".
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Operador sobre un par lector/escritor. `stdio()` para la terminal; en
/// tests se usa con buffers en memoria.
pub struct ConsoleOperator<R, W> {
    io: Mutex<(R, W)>,
}

impl ConsoleOperator<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> ConsoleOperator<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { io: Mutex::new((reader, writer)) }
    }

    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(pair) => pair,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut guard) = self.io.lock() {
            let _ = writeln!(guard.1, "{line}");
        }
    }

    /// Escribe `prompt` y lee una línea; `None` en EOF.
    fn prompt(&self, prompt: &str) -> io::Result<Option<String>> {
        let mut guard = self.io
                            .lock()
                            .map_err(|_| io::Error::new(io::ErrorKind::Other, "operator console poisoned"))?;
        let (reader, writer) = &mut *guard;
        write!(writer, "{prompt}")?;
        writer.flush()?;
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead + Send, W: Write + Send> Operator for ConsoleOperator<R, W> {
    fn say(&self, line: &str) {
        self.write_line(line);
    }

    fn warn(&self, line: &str) {
        self.write_line(line);
    }

    fn ask_step(&self, prompt: &str, default: usize) -> io::Result<usize> {
        loop {
            let answer = self.prompt(&format!("{prompt} [{default}]: "))?
                             .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no step number given"))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) => return Ok(n),
                Err(_) => self.write_line(&format!("Error: {answer} is not a valid step number")),
            }
        }
    }

    fn confirm(&self, question: &str) -> io::Result<bool> {
        loop {
            let Some(answer) = self.prompt(&format!("{question} [y/N]: "))? else {
                return Ok(false);
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => self.write_line("Error: invalid input"),
            }
        }
    }
}
