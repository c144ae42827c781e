pub mod config_ops;
pub mod convert_ops;
pub mod dict_ops;
pub mod user_dict_ops;

/// Unwrap a `Result` or print the error and exit with status 1.
#[macro_export]
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub(crate) fn megabytes(path: &str) -> f64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) as f64 / 1_048_576.0
}
