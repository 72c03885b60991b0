//! Static rights-awareness catalog.

use lazy_static::lazy_static;
use serde::Serialize;

/// One area of law in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RightsCategory {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    /// Key acts or rights within the area
    pub details: Vec<&'static str>,
    /// Official government resource
    pub link: &'static str,
}

lazy_static! {
    static ref CATALOG: Vec<RightsCategory> = vec![
        RightsCategory {
            id: 1,
            title: "Consumer Rights",
            description: "Protection against unfair trade practices, defective goods, and service deficiencies.",
            details: vec!["Right to Safety", "Right to Information", "Right to Choose", "Right to Seek Redressal"],
            link: "https://consumerhelpline.gov.in/",
        },
        RightsCategory {
            id: 2,
            title: "Labor Laws",
            description: "Regulations ensuring fair wages, safe working conditions, and social security for workers.",
            details: vec!["Minimum Wages Act", "Factories Act 1948", "Maternity Benefit Act", "PF & ESI Benefits"],
            link: "https://labour.gov.in/",
        },
        RightsCategory {
            id: 3,
            title: "Cyber Laws",
            description: "Legal framework dealing with cybercrimes, electronic commerce, and data privacy.",
            details: vec!["Section 66A (Scrapped)", "Data Privacy", "Identity Theft", "Cyber Stalking"],
            link: "https://www.meity.gov.in/content/cyber-laws",
        },
        RightsCategory {
            id: 4,
            title: "Property Rights",
            description: "Laws governing acquisition, ownership, possession, and tenancy of property.",
            details: vec!["Transfer of Property Act", "Rent Control Act", "Inheritance Rights", "RERA Registration"],
            link: "https://dolr.gov.in/",
        },
        RightsCategory {
            id: 5,
            title: "Family Law",
            description: "Matters regarding marriage, divorce, adoption, and succession across religions.",
            details: vec!["Hindu Marriage Act", "Special Marriage Act", "Dowry Prohibition", "Maintenance Rights"],
            link: "https://legislative.gov.in/",
        },
    ];
}

/// The full catalog, in display order.
pub fn catalog() -> &'static [RightsCategory] {
    &CATALOG
}

/// Categories whose title or description contains `query`, ignoring case.
///
/// An empty query returns the whole catalog.
pub fn search(query: &str) -> Vec<&'static RightsCategory> {
    let needle = query.trim().to_lowercase();
    catalog()
        .iter()
        .filter(|right| {
            right.title.to_lowercase().contains(&needle)
                || right.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Look up a category by id.
pub fn find(id: u32) -> Option<&'static RightsCategory> {
    catalog().iter().find(|right| right.id == id)
}
