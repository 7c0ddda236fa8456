pub mod answer_log;
pub mod llm_service;
pub mod ocr_service;

pub use answer_log::AnswerLog;
pub use llm_service::{ask_llm, build_user_prompt, Completion, LlmService, SYSTEM_MESSAGE};
pub use ocr_service::{OcrEngine, TesseractOcr};
