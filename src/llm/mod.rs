pub mod openai;
pub mod prompt;
pub mod traits;

pub use openai::OpenAiChatClient;
pub use traits::LanguageModel;
