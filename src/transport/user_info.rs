use crate::domain::{Password, UserId};
use crate::transport::xml::text_element;

/// Append the user block the gateway expects on authenticated operations.
///
/// The reply phone is always the user identifier; the element name differs
/// between operations (`xmsUser` for user info, `user` inside `xmsData`).
pub(crate) fn user_element(out: &mut String, tag: &str, user: &UserId, password: &Password) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    text_element(out, UserId::FIELD, user.as_str());
    text_element(out, "replyPhone", user.as_str());
    text_element(out, Password::FIELD, password.as_str());
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Build the `xmsUser` request document for `GetUserInfo`.
pub fn encode_xms_user(user: &UserId, password: &Password) -> String {
    let mut xml = String::with_capacity(96);
    user_element(&mut xml, "xmsUser", user, password);
    xml
}
