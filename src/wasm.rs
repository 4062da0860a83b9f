use crate::generator::Language;
use wasm_bindgen::prelude::*;

/// `language` accepts the same names as the command line (`js`, `dart`, `python`, ...).
#[wasm_bindgen]
pub fn generate_source(xml: &str, language: &str) -> Result<String, JsValue> {
    let language = language
        .parse::<Language>()
        .map_err(|e| JsValue::from_str(&e))?;
    crate::generate_source(xml, language).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn generate_bundle(xml: &str) -> Result<Vec<u8>, JsValue> {
    crate::workspace::parse_workspace(xml.as_bytes())
        .and_then(|blocks| crate::bundle::build_bundle_bytes(&blocks))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
