use anyhow::Result;
use tracing::error;

/// Reports panics without exiting, so unwinding still drops the temp file.
pub fn init() -> Result<()> {
    std::panic::set_hook(Box::new(move |panic_info| {
        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!();
            let file_path = handle_dump(&metadata, panic_info);
            // prints human-panic message
            if let Err(e) = print_msg(file_path, &metadata) {
                eprintln!("{}: failed to print panic report: {e}", env!("CARGO_PKG_NAME"));
            }
            eprintln!("{}", panic_info);
        }

        let msg = format!("{}", panic_info);
        error!("Panic: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            // Better Panic stacktrace that is only enabled when debugging.
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }
    }));
    Ok(())
}
