mod icon;
mod omen;
mod prompts;

pub use icon::{Icon, IconGenerator};
pub use omen::{FALLBACK_OMEN, OmenGenerator};
pub use prompts::{icon_prompt, omen_prompt};
