use buildwatch::cli::run;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        // Anything reaching here is not a user error; those exit from inside the command
        eprintln!("Internal error: {}", e);
        let mut source = e.source();
        if source.is_some() {
            eprintln!("\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                eprintln!("{:indent$}  {}", "", err);
                source = err.source();
                indent += 1;
            }
        }
        std::process::exit(2);
    }
}
