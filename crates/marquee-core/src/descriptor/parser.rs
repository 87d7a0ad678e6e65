//! Descriptor parser.
//!
//! Two grammars are recognised:
//!
//! * player API form, sent by Garlic, `IAdea` and compatible SMIL players:
//!   `GAPI/1.0 (UUID:<id>; NAME:<name>) <product>/<firmware> (MODEL:<model>)`
//! * compact form: `<Model>/<firmware> uid=<id> name=<name>`
//!
//! Unknown keys in the compact form are ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{DeviceDescriptor, PlayerModel};

/// Descriptors longer than this are not inspected at all.
pub const MAX_DESCRIPTOR_LEN: usize = 2048;

static PLAYER_API_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\(\s*UUID:\s*(?P<uuid>[^;)]*?)\s*;\s*NAME:\s*(?P<name>[^)]*?)\s*\)\s*(?P<product>[^\s/()]+)/(?P<firmware>[^\s()]+)\s*\(\s*MODEL:\s*(?P<model>[^)]*?)\s*\)",
    )
    .expect("static regex is valid")
});

static COMPACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<model>[A-Za-z][\w.-]*)/(?P<firmware>[^\s/=]+)(?P<params>(?:\s+[A-Za-z_]+=\S*)*)\s*$")
        .expect("static regex is valid")
});

/// Parse a raw descriptor into a resolvable [`DeviceDescriptor`].
///
/// Returns `None` when no known player signature matches or the descriptor
/// carries no unique identifier. Such check-ins must be rejected without
/// touching the store.
pub fn parse(raw: &str) -> Option<DeviceDescriptor> {
    let descriptor = parse_lenient(raw);
    descriptor.is_resolvable().then_some(descriptor)
}

/// Extract whatever identity fields can be found, even from descriptors that
/// would be rejected. The model is `Unknown` when nothing matched.
pub fn parse_lenient(raw: &str) -> DeviceDescriptor {
    let raw = raw.trim();
    if raw.len() > MAX_DESCRIPTOR_LEN {
        return DeviceDescriptor::default();
    }

    parse_player_api(raw)
        .or_else(|| parse_compact(raw))
        .unwrap_or_default()
}

fn parse_player_api(raw: &str) -> Option<DeviceDescriptor> {
    let caps = PLAYER_API_RE.captures(raw)?;
    let unique_id = caps["uuid"].trim().to_string();
    let name = caps["name"].trim();

    Some(DeviceDescriptor {
        display_name: display_name_or_id(name, &unique_id),
        model: PlayerModel::from_signature(&caps["model"]),
        firmware_version: caps["firmware"].to_string(),
        unique_id,
    })
}

fn parse_compact(raw: &str) -> Option<DeviceDescriptor> {
    let caps = COMPACT_RE.captures(raw)?;

    let mut unique_id = String::new();
    let mut name = "";
    for (key, value) in caps["params"]
        .split_whitespace()
        .filter_map(|pair| pair.split_once('='))
    {
        match key.to_ascii_lowercase().as_str() {
            "uid" | "uuid" => unique_id = value.to_string(),
            "name" => name = value,
            _ => {}
        }
    }

    Some(DeviceDescriptor {
        display_name: display_name_or_id(name, &unique_id),
        model: PlayerModel::from_signature(&caps["model"]),
        firmware_version: caps["firmware"].to_string(),
        unique_id,
    })
}

fn display_name_or_id(name: &str, unique_id: &str) -> String {
    if name.is_empty() {
        unique_id.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn compact_form() {
        let d = parse("ModelX/1.2.3 uid=ABC123 name=Lobby-Screen").unwrap();
        assert_eq!(
            d,
            DeviceDescriptor {
                unique_id: "ABC123".into(),
                model: PlayerModel::ModelX,
                firmware_version: "1.2.3".into(),
                display_name: "Lobby-Screen".into(),
            }
        );
    }

    #[test]
    fn compact_form_key_order_and_alias() {
        let d = parse("Qbic/4.1 name=Foyer uuid=q-77 extra=1").unwrap();
        assert_eq!(d.unique_id, "q-77");
        assert_eq!(d.display_name, "Foyer");
        assert_eq!(d.model, PlayerModel::Qbic);
    }

    #[test]
    fn name_defaults_to_unique_id() {
        let d = parse("Screenlite/0.9 uid=SL-1").unwrap();
        assert_eq!(d.display_name, "SL-1");
    }

    #[test]
    fn player_api_form_with_spaces_in_name() {
        let d = parse(
            "GAPI/1.0 (UUID:a8294bat-c28f-50af-f94o-800869af5854; NAME:Player with spaces in name) garlic-linux/v0.6.0.745 (MODEL:Garlic)",
        )
        .unwrap();
        assert_eq!(d.unique_id, "a8294bat-c28f-50af-f94o-800869af5854");
        assert_eq!(d.display_name, "Player with spaces in name");
        assert_eq!(d.firmware_version, "v0.6.0.745");
        assert_eq!(d.model, PlayerModel::Garlic);
    }

    #[test]
    fn iadea_player_api_form() {
        let d = parse(
            "ADAPI/2.0 (UUID:9e7df0ed-2a5c-4a19-bec7-2cc548004d30; NAME:Showroom) SK8855-ADAPI/2.0.5 (MODEL:XMP-2200)",
        )
        .unwrap();
        assert_eq!(d.model, PlayerModel::IadeaXmp2x00);
        assert_eq!(d.firmware_version, "2.0.5");
    }

    #[test]
    fn unrecognized_string_is_rejected() {
        assert!(parse("??unrecognized-device-string").is_none());
        assert!(parse("").is_none());
        assert!(parse("Mozilla/5.0 (X11; Linux x86_64)").is_none());
    }

    #[test]
    fn unknown_model_is_rejected_but_fields_survive_leniently() {
        let raw = "Toaster/2.0 uid=T-1 name=Kitchen";
        assert!(parse(raw).is_none());

        let d = parse_lenient(raw);
        assert_eq!(d.model, PlayerModel::Unknown);
        assert_eq!(d.unique_id, "T-1");
    }

    #[test]
    fn missing_unique_id_is_rejected() {
        assert!(parse("ModelX/1.0 name=NoId").is_none());
        assert!(parse("GAPI/1.0 (UUID: ; NAME:x) garlic-linux/v1 (MODEL:Garlic)").is_none());
    }

    #[test]
    fn oversized_input_is_not_inspected() {
        let raw = format!("ModelX/1.0 uid=A name={}", "n".repeat(MAX_DESCRIPTOR_LEN));
        assert!(parse(&raw).is_none());
    }
}
