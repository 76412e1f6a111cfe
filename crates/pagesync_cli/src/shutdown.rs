use console::Term;
use pagesync::CancelFlag;

/// Set up the Ctrl+C handler for graceful termination.
///
/// The first Ctrl+C flips the engine's cancel flag: committed stages stay
/// committed and in-flight stages stop issuing remote calls. A second
/// Ctrl+C force quits.
pub(crate) fn install_shutdown_handler(cancel: CancelFlag) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        let is_tty = Term::stdout().is_term();
        if is_tty {
            eprintln!("\n\nShutdown requested, finishing committed work...");
            eprintln!("Press Ctrl+C again to force quit.");
        } else {
            tracing::warn!("shutdown requested, stopping further remote calls");
        }

        cancel.cancel();

        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install second Ctrl+C handler");

        if is_tty {
            eprintln!("Force quit!");
        }
        std::process::exit(130);
    });
}
