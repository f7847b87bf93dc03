pub mod chat;
pub mod search;
pub mod settings;
pub mod toasts;

pub use chat::ChatbotPopup;
pub use search::SearchBar;
pub use settings::NavSidebar;
pub use toasts::ToastStack;
