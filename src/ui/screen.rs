use ratatui::Frame;

use crate::app::App;
use crate::route::Route;
use crate::session::TestType;
use crate::ui::{coding, landing, mcq, submitted};

/// A UI Screen boundary: responsible for rendering one route
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Instructions and test selection
pub struct LandingScreen;

impl Screen for LandingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        landing::render_landing(app, f);
    }
}

pub struct McqScreen;

impl Screen for McqScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        mcq::render_mcq(app, f);
    }
}

pub struct CodingScreen;

impl Screen for CodingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        coding::render_coding(app, f);
    }
}

pub struct SubmittedScreen;

impl Screen for SubmittedScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        submitted::render_submitted(app, f);
    }
}

/// Helper to construct the appropriate screen for the current route
pub fn current_screen(route: &Route) -> Box<dyn Screen> {
    match route {
        Route::Landing => Box::new(LandingScreen),
        Route::Test(TestType::Mcq) => Box::new(McqScreen),
        Route::Test(TestType::Coding) => Box::new(CodingScreen),
        Route::Submitted => Box::new(SubmittedScreen),
    }
}
