use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kkc_cli::commands::convert_ops::{self, ConvertOptions};
use kkc_cli::commands::{config_ops, dict_ops, user_dict_ops};
use kkc_core::dict::SourceTag;
use kkc_core::user_dict::UserPos;

#[derive(Parser)]
#[command(name = "dictool", about = "Kana-kanji dictionary build and inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a dictionary from raw source files
    Compile {
        /// Source layout
        #[arg(long, default_value = "mozc")]
        source: String,
        /// Input directory
        input_dir: String,
        /// Output file
        output_file: String,
    },
    /// Compile a text connection matrix (Mozc or MeCab layout)
    CompileConn {
        /// Input text file
        input_txt: String,
        /// Output binary file
        output_file: String,
    },
    /// Show dictionary or connection matrix info (auto-detected by magic bytes)
    Info {
        /// Dictionary (.dict) or connection matrix (.conn) file
        file: String,
    },
    /// Look up a reading (exact match)
    Lookup {
        /// Dictionary file
        dict_file: String,
        /// Reading (hiragana)
        reading: String,
    },
    /// Common-prefix search (every reading that is a prefix of the query)
    Prefix {
        /// Dictionary file
        dict_file: String,
        /// Query (hiragana)
        query: String,
    },
    /// Predictive search (every reading that starts with the prefix)
    Predict {
        /// Dictionary file
        dict_file: String,
        /// Prefix (hiragana)
        prefix: String,
        /// Maximum number of readings
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Convert kana to kanji (N-best)
    Convert {
        /// System dictionary file
        dict_file: String,
        /// Connection matrix file
        conn_file: String,
        /// Kana input
        kana: String,
        /// Number of candidates
        #[arg(short, long, default_value = "10")]
        n: usize,
        /// Extra static source as TAG=PATH (e.g. emoji=emoji.dict)
        #[arg(long = "source", value_parser = convert_ops::parse_source_arg)]
        sources: Vec<(SourceTag, String)>,
        /// Enable a loaded source
        #[arg(long)]
        enable: Vec<SourceTag>,
        /// Disable a loaded source
        #[arg(long)]
        disable: Vec<SourceTag>,
        /// User dictionary file
        #[arg(long)]
        user_dict: Option<String>,
        /// Learned-word history file
        #[arg(long)]
        history: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Look up the connection cost between two POS ids
    ConnCost {
        /// Connection matrix file
        conn_file: String,
        /// Right id of the earlier morpheme
        left: u16,
        /// Left id of the later morpheme
        right: u16,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Manage the user dictionary
    UserDict {
        /// User dictionary file (default: $XDG_DATA_HOME/kkc/user_dict.kkuw)
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(subcommand)]
        action: UserDictAction,
    },
}

#[derive(Subcommand)]
enum UserDictAction {
    /// Add a word
    Add {
        /// Reading (hiragana)
        reading: String,
        /// Surface form
        surface: String,
        /// Part of speech
        #[arg(long, default_value = "noun")]
        pos: UserPos,
        /// Cost (default: user_dict.default_cost)
        #[arg(long, allow_negative_numbers = true)]
        cost: Option<i16>,
    },
    /// Remove a word
    Remove {
        /// Reading (hiragana)
        reading: String,
        /// Surface form
        surface: String,
    },
    /// List all registered words
    List,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Compile {
            source,
            input_dir,
            output_file,
        } => dict_ops::compile(&source, &input_dir, &output_file),
        Command::CompileConn {
            input_txt,
            output_file,
        } => dict_ops::compile_conn(&input_txt, &output_file),
        Command::Info { file } => dict_ops::info(&file),
        Command::Lookup { dict_file, reading } => dict_ops::lookup(&dict_file, &reading),
        Command::Prefix { dict_file, query } => dict_ops::prefix(&dict_file, &query),
        Command::Predict {
            dict_file,
            prefix,
            limit,
        } => dict_ops::predict(&dict_file, &prefix, limit),
        Command::Convert {
            dict_file,
            conn_file,
            kana,
            n,
            sources,
            enable,
            disable,
            user_dict,
            history,
            json,
        } => {
            let opts = ConvertOptions {
                sources,
                enable,
                disable,
                user_dict,
                history,
                json,
            };
            convert_ops::convert_cmd(&dict_file, &conn_file, &kana, n, &opts);
        }
        Command::ConnCost {
            conn_file,
            left,
            right,
        } => convert_ops::conn_cost_cmd(&conn_file, left, right),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::UserDict { file, action } => {
            let path = file.unwrap_or_else(user_dict_ops::default_user_dict_path);
            match action {
                UserDictAction::Add {
                    reading,
                    surface,
                    pos,
                    cost,
                } => user_dict_ops::user_dict_add(&path, &reading, &surface, pos, cost),
                UserDictAction::Remove { reading, surface } => {
                    user_dict_ops::user_dict_remove(&path, &reading, &surface)
                }
                UserDictAction::List => user_dict_ops::user_dict_list(&path),
            }
        }
    }
}
