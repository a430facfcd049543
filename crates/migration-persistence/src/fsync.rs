//! fsync de archivos y directorios.
//!
//! Crear o renombrar un archivo modifica la entrada del directorio; sin fsync
//! del directorio esa entrada puede perderse ante un corte de energía aunque
//! el contenido del archivo ya esté sincronizado.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

pub fn fsync_file(file: &File) -> io::Result<()> {
    file.sync_all()
}

pub fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(dir_path)?;
    dir.sync_all()
}
