use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "open115-supervisor")]
#[command(about = "Start the open115 token manager, wait for tokens, then exec the API server")]
#[command(version)]
pub struct Cli {
    /// Extra arguments appended to the server command line
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub server_args: Vec<String>,
}

impl Cli {
    /// Parse the process arguments (program name first).
    ///
    /// clap answers `--help` and `--version`. The server arguments are then
    /// taken from the raw list, because clap drops a `--` separator that the
    /// server must still see.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        let mut cli = Cli::try_parse_from(&args)?;
        cli.server_args = args.into_iter().skip(1).collect();

        Ok(cli)
    }
}
