use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.common.config();
    match cli.cmd {
        Command::List(args) => super::list::run(args, config).await,
        Command::Show(args) => super::show::run(args, config).await,
        Command::Hyperparams(args) => super::hyperparams::run(args, config).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
