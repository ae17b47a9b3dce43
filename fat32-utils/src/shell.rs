use std::io;

use fat32::error::Error;
use fat32::io::std::FileIO;
use fat32::{Fat32, Session};

use crate::command::Command;
use crate::{info, list};

pub struct Shell {
    fs: Fat32<FileIO>,
    session: Session,
    hex: bool,
}

impl Shell {
    pub fn new(fs: Fat32<FileIO>, hex: bool) -> Self {
        let session = Session::new(&fs);
        Self { fs, session, hex }
    }

    pub fn path(&self) -> &str {
        self.session.path()
    }

    /// Returns false once the session should end
    pub fn execute(&mut self, command: Command) -> Result<bool, Error<io::Error>> {
        let Self { fs, session, hex } = self;
        trace!("Execute {:?}", command);
        match command {
            Command::Info => info::info(fs.parameters()),
            Command::Stat(name) => list::stat(&session.directory(fs).find(&name)?),
            Command::Size(name) => {
                let entry = session.directory(fs).find(&name)?;
                println!("Size of {} is {} bytes", entry.name(), entry.size());
            }
            Command::Cd(name) => session.change_directory(fs, &name)?,
            Command::Ls(name) => {
                let cluster = match name {
                    Some(name) => session.lookup(fs, &name)?,
                    None => session.cwd(),
                };
                list::list(&fs.directory(cluster).walk()?);
            }
            Command::Read { name, offset, length } => {
                let data = session.directory(fs).open_file(&name)?.read_at(offset, length)?;
                match *hex {
                    true => println!("{}", pretty_hex::pretty_hex(&data)),
                    false => println!("{}", String::from_utf8_lossy(&data)),
                }
            }
            Command::Volume => info::volume(fs.volume_label()?),
            Command::Mkdir(name) => session.directory(fs).create_dir(&name)?,
            Command::Rmdir(name) => session.directory(fs).remove_dir(&name)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}
