//! Fixed FAQ table
//!
//! Questions are matched exactly after normalization. There is no fuzzy or
//! partial matching: the table is a curated list, not a search index.

use indexmap::IndexMap;

/// Built-in question/answer pairs, questions already normalized
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    (
        "do you work with startups or only enterprises?",
        "We work with both from fast-growing startups needing quick insights to large enterprises needing complex predictive dashboards.",
    ),
    (
        "do you offer ongoing support?",
        "Yes. We provide full implementation, training, and 24/7 support options depending on your plan.",
    ),
    (
        "do you partner with cloud providers?",
        "Yes. We integrate seamlessly with AWS, Azure, GCP, and private/on-prem setups.",
    ),
    (
        "what makes red switch unique?",
        "Unlike generic BI vendors, we focus on prediction + interactive dashboards - helping you not only see what's happening but also forecast what's next.",
    ),
    (
        "how do you price your solutions?",
        "Pricing depends on scope - number of users, data sources, and complexity of predictive models. We offer flexible packages for SMEs and enterprises.",
    ),
    (
        "how quickly can i see results?",
        "Usually within weeks. Once we connect your data, you'll see live dashboards right away. Predictive models take a bit longer, but still within the first quarter.",
    ),
    (
        "how does red switch differ from other analytics vendors?",
        "We focus on prediction, not just reports. Our dashboards are live, interactive, and powered by predictive models, so you see both what's happening now and what's likely next.",
    ),
    (
        "how quickly can predictive models be deployed?",
        "Typically within weeks. Once your data pipeline is connected, first models go live alongside your dashboards.",
    ),
    (
        "what services does red switch provide?",
        "We offer solutions tailored for industries like healthcare, logistics, oil & gas, retail, and fintech.",
    ),
    (
        "what industries does red switch serve?",
        "We work across pharma & healthcare, logistics & supply chain, oil & gas, retail & e-commerce, and fintech/banking.",
    ),
    (
        "how does red switch ensure data security?",
        "We follow enterprise-grade security standards including encryption at rest & in transit, role-based access, and compliance with HIPAA, GDPR, and PCI-DSS.",
    ),
    (
        "do your dashboards support real-time data?",
        "Yes. We integrate with ERPS, CRMs, IoT sensors, and transactional systems to update dashboards in real time.",
    ),
    (
        "can we get role-based dashboards?",
        "Absolutely. We will provide the following to you, 'Executives get KPI summaries, while operations teams get detailed, drill-down dashboards'.",
    ),
];

/// Normalize user text for comparison: trim surrounding whitespace and lowercase
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Immutable question to answer lookup
#[derive(Debug, Clone)]
pub struct FaqTable {
    entries: IndexMap<String, String>,
}

impl FaqTable {
    /// Build the table shipped with the gateway
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_ENTRIES
                .iter()
                .map(|(q, a)| ((*q).to_string(), (*a).to_string())),
        )
    }

    /// Build a table from arbitrary pairs; questions are normalized on insert
    ///
    /// A later duplicate question replaces the earlier answer but keeps its position.
    pub fn from_entries(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(question, answer)| (normalize(&question), answer))
            .collect();

        Self { entries }
    }

    /// Look up the answer for a question
    #[must_use]
    pub fn lookup(&self, question: &str) -> Option<&str> {
        self.entries.get(&normalize(question)).map(String::as_str)
    }

    /// Normalized questions in insertion order
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FaqTable {
    fn default() -> Self {
        Self::builtin()
    }
}
