use std::fs;
use std::path::Path;
use std::process;

use crate::commands::megabytes;
use crate::die;
use crate::dict_source;
use kkc_core::dict::connection::ConnectionMatrix;
use kkc_core::dict::{Dictionary, Token, TrieDictionary};

const SAMPLE_READINGS: [&str; 4] = ["かんじ", "にほん", "とうきょう", "たべる"];

pub fn compile(source_name: &str, input_dir: &str, output_file: &str) {
    let source = dict_source::from_name(source_name).unwrap_or_else(|| {
        eprintln!("Error: unknown source '{source_name}' (available: mozc)");
        process::exit(1);
    });

    let input_path = Path::new(input_dir);
    if !input_path.is_dir() {
        eprintln!("Error: {input_dir} is not a directory");
        process::exit(1);
    }

    eprintln!("Source: {source_name}");
    let entries = die!(source.parse_dir(input_path), "Error parsing dictionary: {}");
    let reading_count = entries.len();
    let entry_count: usize = entries.values().map(Vec::len).sum();
    eprintln!("Building tries from {reading_count} readings ({entry_count} entries)...");

    let dict = die!(
        TrieDictionary::from_entries(entries),
        "Error building dictionary: {}"
    );
    die!(
        dict.save(Path::new(output_file)),
        "Error writing dictionary: {}"
    );
    eprintln!("Wrote {output_file} ({:.1} MB)", megabytes(output_file));
}

pub fn compile_conn(input_txt: &str, output_file: &str) {
    let text = die!(
        fs::read_to_string(input_txt),
        "Error reading {input_txt}: {}"
    );

    eprintln!("Parsing connection matrix from {input_txt}...");
    let matrix = die!(
        ConnectionMatrix::from_text(&text),
        "Error parsing connection matrix: {}"
    );
    eprintln!("  Matrix size: {0}x{0}", matrix.num_ids());

    die!(
        matrix.save(Path::new(output_file)),
        "Error writing {output_file}: {}"
    );
    eprintln!("Wrote {output_file} ({:.1} MB)", megabytes(output_file));
}

/// Show a summary of a `.dict` or `.conn` file, picked by its magic bytes.
pub fn info(file: &str) {
    let magic = fs::read(file)
        .ok()
        .and_then(|b| b.get(..4).map(<[u8]>::to_vec));

    match magic.as_deref() {
        Some(b"KKCX") => info_conn(file),
        Some(b"KKDX") => info_dict(file),
        Some(other) => {
            eprintln!(
                "Unknown file format (magic: {:?})",
                String::from_utf8_lossy(other)
            );
            process::exit(1);
        }
        None => {
            eprintln!("Error reading file: {file}");
            process::exit(1);
        }
    }
}

fn info_dict(dict_file: &str) {
    let dict = open_dict(dict_file);
    let (reading_count, token_count) = dict.stats();

    println!("Dictionary: {dict_file}");
    println!("File size:  {:.1} MB", megabytes(dict_file));
    println!("Readings:   {reading_count}");
    println!("Tokens:     {token_count}");
    match dict.max_pos_id() {
        Some(id) => println!("Max POS id: {id}"),
        None => println!("Max POS id: (none)"),
    }
    println!("Heap:       {:.1} MB", dict.heap_bytes() as f64 / 1_048_576.0);

    println!();
    println!("Sample lookups:");
    for key in SAMPLE_READINGS {
        let tokens = dict.lookup(key);
        if tokens.is_empty() {
            println!("  {key} → (not found)");
        } else {
            let surfaces: Vec<&str> = tokens.iter().take(5).map(|t| t.surface.as_str()).collect();
            println!("  {key} → {}", surfaces.join(", "));
        }
    }
}

fn info_conn(conn_file: &str) {
    let conn = die!(
        ConnectionMatrix::open(Path::new(conn_file)),
        "Error opening connection matrix: {}"
    );
    let num_ids = conn.num_ids();

    println!("Connection matrix: {conn_file}");
    println!("File size:  {:.1} MB", megabytes(conn_file));
    println!("POS IDs:    {num_ids}");
    println!(
        "Matrix:     {num_ids}x{num_ids} = {} entries",
        num_ids as u64 * num_ids as u64
    );
    println!("Mapped:     {}", conn.is_mapped());
}

fn open_dict(dict_file: &str) -> TrieDictionary {
    die!(
        TrieDictionary::open(Path::new(dict_file)),
        "Error opening dictionary: {}"
    )
}

fn print_tokens(tokens: &[Token]) {
    for t in tokens {
        println!(
            "  {} \tcost={}\tL={}\tR={}",
            t.surface, t.cost, t.left_id, t.right_id
        );
    }
}

pub fn lookup(dict_file: &str, reading: &str) {
    let dict = open_dict(dict_file);
    let tokens = dict.lookup(reading);
    if tokens.is_empty() {
        println!("{reading}: not found");
    } else {
        println!("{reading}: {} entries", tokens.len());
        print_tokens(&tokens);
    }
}

pub fn prefix(dict_file: &str, query: &str) {
    let dict = open_dict(dict_file);
    let results = dict.common_prefix_search(query);
    if results.is_empty() {
        println!("{query}: no prefix matches");
        return;
    }
    for r in &results {
        println!("{} ({} entries):", r.reading, r.entries.len());
        print_tokens(&r.entries);
    }
}

pub fn predict(dict_file: &str, prefix: &str, limit: usize) {
    let dict = open_dict(dict_file);
    let results = dict.predict(prefix, limit);
    if results.is_empty() {
        println!("{prefix}: no completions");
        return;
    }
    for r in &results {
        println!("{} ({} entries):", r.reading, r.entries.len());
        print_tokens(&r.entries);
    }
}
