use std::sync::{Arc, RwLock};

/// Where rendered markup ends up.
pub trait MountPoint {
    fn mount(
        &self,
        markup: String,
    );
}

/// Latest markup, shared between the polling session and whoever serves it.
#[derive(Clone, Debug, Default)]
pub struct SharedMarkup {
    markup: Arc<RwLock<String>>,
}

impl SharedMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> String {
        match self.markup.read() {
            Ok(markup) => markup.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MountPoint for SharedMarkup {
    fn mount(
        &self,
        markup: String,
    ) {
        match self.markup.write() {
            Ok(mut current) => *current = markup,
            Err(poisoned) => *poisoned.into_inner() = markup,
        }
    }
}
