use chrono::NaiveDateTime;
use fat32::{DirectoryEntry, Listing};

fn modified(entry: &DirectoryEntry) -> String {
    let datetime: Option<NaiveDateTime> = entry.modified().to_naive();
    match datetime {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".repeat(19),
    }
}

pub fn list(listing: &Listing) {
    for entry in listing {
        let attrs = entry.attributes();
        print!("{}", if attrs.directory() > 0 { "d" } else { "-" });
        print!("{}", if attrs.read_only() > 0 { "r" } else { "-" });
        print!("{}", if attrs.system() > 0 { "s" } else { "-" });
        print!("{}", if attrs.hidden() > 0 { "h" } else { "-" });
        print!("{}", if attrs.archive() > 0 { "a" } else { "-" });
        print!(" {:8}", entry.size());
        print!(" {}", modified(entry));
        match entry.is_directory() {
            true => println!(" {}/", entry.name()),
            false => println!(" {}", entry.name()),
        }
    }
}

pub fn stat(entry: &DirectoryEntry) {
    println!("Size is {}", entry.size());
    println!("Attributes {}", entry.attributes());
    println!("Next cluster number is {:#06x}", u32::from(entry.first_cluster()));
    println!("Modified {}", modified(entry));
}
