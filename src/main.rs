use linesh::executor::{snapshot_env, Executor};
use linesh::repl;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut executor = Executor::new(snapshot_env());
    repl::run(&mut executor)?;

    std::process::exit(0);
}
