use std::fmt;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    /// Anchor whose visible text equals the given string.
    LinkText(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn id(id: &str) -> Self {
        Locator::Css(format!("#{}", id))
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Locator::XPath(path.into())
    }

    pub fn link_text(text: impl Into<String>) -> Self {
        Locator::LinkText(text.into())
    }

    /// The XPath a non-CSS locator resolves to, `None` for CSS selectors.
    pub fn as_xpath(&self) -> Option<String> {
        match self {
            Locator::Css(_) => None,
            Locator::XPath(path) => Some(path.clone()),
            Locator::LinkText(text) => Some(format!(
                "//a[normalize-space(.)={}]",
                xpath_literal(text.trim())
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css={}", selector),
            Locator::XPath(path) => write!(f, "xpath={}", path),
            Locator::LinkText(text) => write!(f, "link={}", text),
        }
    }
}

/// Quote a string for use inside an XPath expression.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Ordered alternatives for one piece of information, tried first to last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorChain {
    locators: Vec<Locator>,
}

impl LocatorChain {
    pub fn new(locators: Vec<Locator>) -> Self {
        Self { locators }
    }

    pub fn then(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locator> {
        self.locators.iter()
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl FromIterator<Locator> for LocatorChain {
    fn from_iter<I: IntoIterator<Item = Locator>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
