use jstree::common::{data_uri, dimension, mediatype, number, replace_entities, DataUriError};
use std::collections::HashMap;

#[test]
fn number_prefix_lengths() {
    let tests = [
        ("5", 1),
        ("0.51", 4),
        ("0.5e-99", 7),
        ("0.5e-", 3),
        ("+50.0", 5),
        (".0", 2),
        ("0.", 1),
        ("", 0),
        ("+", 0),
        (".", 0),
        ("a", 0),
    ];
    for (input, expected) in tests {
        assert_eq!(number(input.as_bytes()), expected, "number({:?})", input);
    }
}

#[test]
fn dimension_splitting() {
    let tests = [
        ("5px", 1, 2),
        ("5px ", 1, 2),
        ("5%", 1, 1),
        ("5em", 1, 2),
        ("px", 0, 0),
        ("1", 1, 0),
        ("1~", 1, 0),
    ];
    for (input, num, unit) in tests {
        assert_eq!(
            dimension(input.as_bytes()),
            (num, unit),
            "dimension({:?})",
            input
        );
    }
}

#[test]
fn mediatype_parsing() {
    let tests = [
        ("text/plain", "text/plain"),
        ("text/plain;charset=US-ASCII", "text/plain"),
        (" text/plain  ; charset = US-ASCII ", "text/plain"),
        (" text/plain  a", "text/plain"),
        ("text/plain;base64", "text/plain"),
        ("text/plain;inline=;base64", "text/plain"),
    ];
    for (input, expected) in tests {
        let (mimetype, _) = mediatype(input.as_bytes());
        assert_eq!(mimetype, expected.as_bytes(), "mediatype({:?})", input);
    }

    let (_, params) = mediatype(b" text/plain  ; charset = US-ASCII ");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0, "charset");
    assert_eq!(params[0].1, "US-ASCII");

    let (_, params) = mediatype(b"text/plain;inline=;base64");
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].0, "inline");
    assert_eq!(params[0].1, "");
    assert_eq!(params[1].0, "base64");
    assert_eq!(params[1].1, "");
}

#[test]
fn data_uri_parsing() {
    assert_eq!(data_uri(b"www.domain.com"), Err(DataUriError::BadDataUri));

    let tests = [
        ("data:,", "text/plain", ""),
        ("data:text/xml,", "text/xml", ""),
        ("data:,text", "text/plain", "text"),
        ("data:;base64,dGV4dA==", "text/plain", "text"),
        ("data:image/svg+xml,", "image/svg+xml", ""),
    ];
    for (input, expected_mimetype, expected_data) in tests {
        let (mimetype, data) = data_uri(input.as_bytes()).unwrap();
        assert_eq!(
            mimetype.as_ref(),
            expected_mimetype.as_bytes(),
            "mimetype of {:?}",
            input
        );
        assert_eq!(
            data.as_ref(),
            expected_data.as_bytes(),
            "data of {:?}",
            input
        );
    }

    assert!(matches!(
        data_uri(b"data:;base64,()"),
        Err(DataUriError::Base64(_))
    ));
}

#[test]
fn entity_replacement() {
    let entities: HashMap<&str, &[u8]> = HashMap::from([
        ("varphi", &b"&phiv;"[..]),
        ("varpi", &b"&piv;"[..]),
        ("quot", &b"\""[..]),
        ("apos", &b"'"[..]),
        ("amp", &b"&"[..]),
    ]);
    let rev_entities: HashMap<u8, &[u8]> = HashMap::from([(b'\'', &b"&#39;"[..])]);

    let tests = [
        ("&#34;", "\""),
        ("&#039;", "&#39;"),
        ("&#x0022;", "\""),
        ("&#x27;", "&#39;"),
        ("&quot;", "\""),
        ("&apos;", "&#39;"),
        ("&#9191;", "&#9191;"),
        ("&#x23e7;", "&#9191;"),
        ("&#x23E7;", "&#9191;"),
        ("&#x270F;", "&#9999;"),
        ("&#x2710;", "&#x2710;"),
        ("&apos;&quot;", "&#39;\""),
        ("&#34", "&#34"),
        ("&#x22", "&#x22"),
        ("&apos", "&apos"),
        ("&amp;", "&"),
        ("&#39;", "&#39;"),
        ("&amp;amp;", "&amp;amp;"),
        ("&amp;#34;", "&amp;#34;"),
        ("&amp;a mp;", "&a mp;"),
        ("&amp;DiacriticalAcute;", "&amp;DiacriticalAcute;"),
        (
            "&amp;CounterClockwiseContourIntegral;",
            "&amp;CounterClockwiseContourIntegral;",
        ),
        (
            "&amp;CounterClockwiseContourIntegralL;",
            "&CounterClockwiseContourIntegralL;",
        ),
        ("&varphi;", "&phiv;"),
        ("&varpi;", "&piv;"),
        ("&varnone;", "&varnone;"),
    ];
    for (input, expected) in tests {
        let replaced = replace_entities(input.as_bytes(), &entities, &rev_entities);
        assert_eq!(
            replaced.as_ref(),
            expected.as_bytes(),
            "replace_entities({:?})",
            input
        );
    }
}
