//! Navigation hook invoked when the session is lost.

use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Home => "/",
        }
    }
}

/// Moves the user interface to another screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Only records navigation requests in the log. Used by headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        info!("Navigation requested to {}", route.path());
    }
}

/// Publishes the latest requested route on a watch channel.
#[derive(Debug)]
pub struct WatchNavigator {
    tx: watch::Sender<Option<Route>>,
}

impl WatchNavigator {
    pub fn new() -> (Self, watch::Receiver<Option<Route>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

impl Navigator for WatchNavigator {
    fn navigate(&self, route: Route) {
        info!("Navigating to {}", route.path());
        self.tx.send_replace(Some(route));
    }
}
