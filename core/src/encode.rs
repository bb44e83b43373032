//! Percent-encoding for path segments and query components.
//!
//! Matrix identifiers (room ids, user ids, event ids, aliases) routinely
//! contain `!`, `#`, `:`, `@`, and `$`, all of which are reserved in URL
//! paths. Every caller-supplied identifier that lands in a request path goes
//! through [`encode_path_segment`] exactly once; multi-segment paths are
//! never encoded as a whole — callers encode each segment independently and
//! join them with literal `/`.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Path segment safe set: encode controls, space, and every reserved
/// character that could be mistaken for URL structure inside a segment.
/// Non-ASCII bytes are always percent-encoded by `utf8_percent_encode`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Query component safe set: encode everything that would terminate or
/// restructure a `key=value` pair.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// Percent-encode a single URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Percent-encode a query key or value.
pub fn encode_query_component(component: &str) -> String {
    utf8_percent_encode(component, QUERY).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn encodes_room_id() {
        assert_eq!(encode_path_segment("!abc:example.org"), "%21abc%3Aexample.org");
    }

    #[test]
    fn encodes_user_id() {
        assert_eq!(encode_path_segment("@alice:example.org"), "%40alice%3Aexample.org");
    }

    #[test]
    fn encodes_event_id_and_alias() {
        assert_eq!(encode_path_segment("$event:host"), "%24event%3Ahost");
        assert_eq!(encode_path_segment("#room:host"), "%23room%3Ahost");
    }

    #[test]
    fn encodes_space_percent_and_slash() {
        assert_eq!(encode_path_segment("a b"), "a%20b");
        assert_eq!(encode_path_segment("50%"), "50%25");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
    }

    #[test]
    fn encodes_non_ascii() {
        assert_eq!(encode_path_segment("café"), "caf%C3%A9");
    }

    #[test]
    fn leaves_unreserved_alone() {
        assert_eq!(encode_path_segment("m.room.message"), "m.room.message");
        assert_eq!(encode_path_segment("txn-1_2~3"), "txn-1_2~3");
    }

    #[test]
    fn reserved_characters_never_survive_unescaped() {
        for id in ["!r:h", "#a:h", "$e:h", "@u:h", "a b", "x%y"] {
            let encoded = encode_path_segment(id);
            for reserved in ['!', '#', '$', '@', ':', ' ', '%'] {
                // '%' only appears as the escape introducer.
                if reserved == '%' {
                    continue;
                }
                assert!(!encoded.contains(reserved), "{reserved:?} leaked in {encoded}");
            }
        }
    }

    #[test]
    fn round_trips_through_decoding() {
        for id in ["!abc:example.org", "@alice:example.org", "#general:host", "a b%c+d", "café"] {
            let encoded = encode_path_segment(id);
            let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
            assert_eq!(decoded, id);
        }
    }

    #[test]
    fn query_component_round_trips() {
        let encoded = encode_query_component("a b&c=d");
        assert_eq!(encoded, "a%20b%26c%3Dd");
        let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
        assert_eq!(decoded, "a b&c=d");
    }
}
