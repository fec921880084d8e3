pub mod lexicon;
pub mod romaji;
pub mod settings;
pub mod unicode;
