//! Page rendering.
//!
//! Templates are compiled into the binary and rendered with `minijinja`. Names
//! ending in `.html` get HTML auto-escaping, so words and definitions coming
//! from clients or the upstream are escaped on output.

use crate::search::PageData;
use minijinja::Environment;

const INDEX_TEMPLATE: &str = "index.html";
const RESULTS_TEMPLATE: &str = "results.html";
const HISTORY_TEMPLATE: &str = "history.html";

/// Which page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Search form plus the history list
    Index,
    /// Search results or the failure message
    Results,
    /// History list alone
    History,
}

impl Page {
    fn template_name(self) -> &'static str {
        match self {
            Page::Index => INDEX_TEMPLATE,
            Page::Results => RESULTS_TEMPLATE,
            Page::History => HISTORY_TEMPLATE,
        }
    }
}

/// Holds the compiled page templates.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Compile the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        env.add_template(RESULTS_TEMPLATE, include_str!("../templates/results.html"))?;
        env.add_template(HISTORY_TEMPLATE, include_str!("../templates/history.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, page: Page, data: &PageData) -> Result<String, minijinja::Error> {
        self.env.get_template(page.template_name())?.render(data)
    }
}
