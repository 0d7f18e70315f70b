// Message composition: template lookup, positional substitution and
// rich-text stripping for plain-text channels.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::lang::Localization;

lazy_static! {
    /// Rich-text tags the plain-text channels cannot render.
    static ref FILTER_TAGS: Regex = Regex::new(
        r"(?i)</?(align|alpha|color|cspace|indent|line-height|line-indent|margin|mark|mspace|pos|size|space|voffset).*?>|</?(b|i|lowercase|uppercase|smallcaps|s|u|sup|sub)>"
    )
    .expect("Invalid tag filter regex");

    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\d+)\}").expect("Invalid placeholder regex");
}

pub struct NotificationComposer<L> {
    lang: L,
}

impl<L: Localization> NotificationComposer<L> {
    pub fn new(lang: L) -> Self {
        Self { lang }
    }

    /// Resolve `key` and substitute `params` positionally.
    ///
    /// A missing key yields the key itself so translation gaps stay visible.
    /// Placeholders without a matching parameter are left as written.
    pub fn compose(&self, key: &str, params: &[String]) -> String {
        match self.lang.template(key, None) {
            Some(template) => substitute(&template, params),
            None => {
                log::debug!("No template for {}", key);
                key.to_string()
            }
        }
    }

    /// Compose only when `value` is non-empty; used for optional fragments
    /// such as " at D7" that vanish when there is nothing to say.
    pub fn fragment(&self, key: &str, value: &str) -> String {
        if value.is_empty() {
            String::new()
        } else {
            self.compose(key, &[value.to_string()])
        }
    }
}

fn substitute(template: &str, params: &[String]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| params.get(idx))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Strip rich-text markup. Text outside matched tags is untouched; tags
/// that do not match the filter pass through. Repeats until nothing more
/// matches, so stripping twice equals stripping once.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    while FILTER_TAGS.is_match(&current) {
        current = FILTER_TAGS.replace_all(&current, "").into_owned();
    }
    current
}
