/// A named set of CSS query patterns counting one semantic category of
/// elements (links, buttons, navigation, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorGroup {
    pub name: &'static str,
    pub selector: &'static str,
}

/// The fixed inspection checklist, in report order. A later run over an
/// unchanged page must reproduce identical counts for every group.
const SELECTOR_GROUPS: &[SelectorGroup] = &[
    SelectorGroup {
        name: "links",
        selector: "a",
    },
    SelectorGroup {
        name: "buttons",
        selector: "button",
    },
    SelectorGroup {
        name: "main-content",
        selector: "main, [role=main], .main, #main",
    },
    SelectorGroup {
        name: "navigation",
        selector: "nav, [role=navigation]",
    },
    SelectorGroup {
        name: "articles",
        selector: "article, .article, [role=article]",
    },
    SelectorGroup {
        name: "clickable",
        selector: "a, button, [role=button], [onclick]",
    },
];

pub fn selector_groups() -> &'static [SelectorGroup] {
    SELECTOR_GROUPS
}
