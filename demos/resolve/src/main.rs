use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use projmap_bus::{BusConfig, NatsBus};
use projmap_observe::{LogConfig, init_logging};
use projmap_resolver::{ProjectResolver, ResolveError};

const USAGE: &str = "usage: resolve slug <slug> | resolve uid <uid> | resolve root";

enum Command {
    Slug(String),
    Uid(String),
    Root,
}

fn parse_args() -> Option<Command> {
    let mut args = std::env::args().skip(1);
    let cmd = match (args.next()?.as_str(), args.next()) {
        ("slug", Some(slug)) => Command::Slug(slug),
        ("uid", Some(uid)) => Command::Uid(uid),
        ("root", None) => Command::Root,
        _ => return None,
    };
    args.next().is_none().then_some(cmd)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(cmd) = parse_args() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    // 1) Logger
    init_logging(&LogConfig::from_env()?)?;

    // 2) Bus
    let bus_cfg = BusConfig::from_env().with_name("projmap-resolve");
    let bus = NatsBus::connect(&bus_cfg).await?;

    // 3) Resolver; Ctrl+C cancels the in-flight lookup
    let resolver = ProjectResolver::new(Arc::new(bus));
    let ctx = CancellationToken::new();
    let on_signal = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling lookup");
            on_signal.cancel();
        }
    });

    // 4) Lookup
    let result: Result<String, ResolveError> = match cmd {
        Command::Slug(slug) => resolver.uid_by_slug(&ctx, &slug).await.map(String::from),
        Command::Uid(uid) => resolver.slug_by_uid(&ctx, &uid).await.map(String::from),
        Command::Root => resolver.root_uid(&ctx).await.map(String::from),
    };

    match result {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(e) => {
            error!(key = e.key(), lookup = %e.lookup(), "lookup failed: {e}");
            Err(e.into())
        }
    }
}
