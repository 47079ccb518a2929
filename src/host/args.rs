use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;


#[derive(Parser, Debug)]
#[command(name = "tabtally-host", version, about = "Native messaging host recording time spent on browser tabs")]
pub struct HostArgs {
  /// Application directory. By default $XDG_STATE_HOME/tabtally or $HOME/.local/state/tabtally
  #[arg(long)]
  pub dir: Option<PathBuf>,
  /// Mirror logs to stderr. stdout is reserved for the browser.
  #[arg(long = "log-console")]
  pub log_console : bool,
  #[arg(long = "log-filter")]
  pub log: Option<LevelFilter>,
  /// Handle of the calling window, passed by Chromium on Windows.
  #[arg(long = "parent-window")]
  pub parent_window: Option<i64>,
  /// Whatever the browser passes when launching the host: the caller origin for Chromium, the
  /// manifest path and extension id for Firefox.
  pub launcher_args: Vec<String>,
}
