#![forbid(unsafe_code)]

fn main() {
    let json_errors = std::env::args().any(|arg| arg == "--json-errors");
    if let Err(error) = reorder_replay::run_from_env() {
        if json_errors {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
