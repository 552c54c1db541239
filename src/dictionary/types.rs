use serde::{Deserialize, Deserializer, Serialize};

/// One headword's dictionary record as returned by the upstream service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub word: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phonetic: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phonetics: Vec<Phonetic>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meanings: Vec<Meaning>,
}

/// A pronunciation: transcription plus an optional audio clip URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phonetic {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    #[serde(default)]
    pub definition: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub example: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub antonyms: Vec<String>,
}

/// The upstream sends `""` (or `null`) for missing audio and phonetic text.
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Lists may arrive as an explicit `null`; treat that like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
