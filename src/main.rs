use std::process::ExitCode;

use anyhow::Result;

use ingress2gateway::{app::App, cmd::Command};

fn main() -> Result<ExitCode> {
    let cmd = Command::init();

    App::run(cmd)
}
