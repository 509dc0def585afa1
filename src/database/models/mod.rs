pub mod comment;
pub mod post;
pub mod user;

use serde::Deserialize;

fn default_limit() -> u32 {
    10
}

/// Offset pagination taken from `?skip=&limit=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    pub fn size(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, default_limit())
    }
}
