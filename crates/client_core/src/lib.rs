//! Client-side conversation core: transcript, session controller, and the
//! responder boundary to the remote answering service.

pub mod responder;
pub mod session;
pub mod settings;
pub mod suggestions;
pub mod transcript;

pub use responder::{HttpResponder, Responder, ResponderError};
pub use session::{Session, SessionPhase, SubmitOutcome, SuggestionVisibility};
pub use settings::{load_settings, ChatSettings, PageText, SettingsError};
pub use suggestions::SuggestionCatalog;
pub use transcript::Transcript;
