/// Flattens editor HTML into the text body of an upload.
///
/// Every `<...>` run is dropped, then `&nbsp;` becomes a plain space. No other
/// entity is decoded. A `<` with no closing `>` after it is kept as text.
pub fn html_to_plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(len) => {
                text.push_str(&rest[..start]);
                rest = &rest[start + len + 1..];
            }
            None => break,
        }
    }
    text.push_str(rest);

    text.replace("&nbsp;", " ")
}
