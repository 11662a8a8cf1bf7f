use clap::Parser;
use miette::Result;
use mathdb::cli::logger::init_logger;
use mathdb::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Terminate quietly when stdout is a closed pipe (`mathdb list data | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logger(global.verbose, global.quiet);

    match cli.command {
        Commands::Build(args) => mathdb::cli::commands::build::run(args, &global),
        Commands::Serve(args) => mathdb::cli::commands::serve::run(args, &global),
        Commands::Check(args) => mathdb::cli::commands::check::run(args, &global),
        Commands::List(args) => mathdb::cli::commands::list::run(args),
        Commands::Completions(args) => mathdb::cli::commands::completions::run(args),
    }
}
