mod app;
mod ui;

use crate::config::DashConfig;
use crate::dataset::DashboardData;
use crate::error::Result;

pub use app::App;

/// Run the interactive dashboard until the user quits
pub fn run(data: DashboardData, config: &DashConfig, live: bool) -> Result<()> {
    let mut app = App::new(data, config, live);
    app.run()
}
