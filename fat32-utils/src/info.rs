use fat32::{Label, VolumeParameters};

pub fn info(params: &VolumeParameters) {
    let fields: [(&str, u32); 6] = [
        ("BPB_BytesPerSec", params.bytes_per_sector as u32),
        ("BPB_SecPerClus", params.sectors_per_cluster as u32),
        ("BPB_RsvdSecCnt", params.reserved_sector_count as u32),
        ("BPB_NumFATS", params.fat_count as u32),
        ("BPB_FATSz32", params.sectors_per_fat),
        ("BPB_RootClus", params.root_cluster.into()),
    ];
    println!("info:   field              hex       dec");
    for (field, value) in fields {
        println!("        {:<15} {:>7} {:>8}", field, format!("{:#x}", value), value);
    }
}

pub fn volume(label: Option<Label>) {
    match label {
        Some(label) => println!("Volume name is {}", label),
        None => eprintln!("Error: volume name not found."),
    }
}
