use crate::model::BookDraft;

/// A draft that passes every validation rule; tests tweak fields from
/// here instead of re-stating the whole record.
pub fn sample_draft(slug: &str, title: &str) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: "Cal Newport".to_string(),
        year: 2016,
        categories: vec!["Negócios".to_string()],
        themes: vec!["Foco".to_string()],
        summary: "A focused argument about why the capacity for deep, undistracted work is \
                  becoming rarer and more valuable, with concrete routines for cultivating it."
            .to_string(),
        key_takeaways: vec![
            "Deep work is the ability to focus without distraction".to_string(),
            "Shallow work crowds out the valuable kind".to_string(),
            "Routines and rituals protect long stretches of focus".to_string(),
        ],
        for_whom: "Knowledge workers drowning in notifications".to_string(),
        quote: "Clarity about what matters provides clarity about what does not.".to_string(),
        cover_image: String::new(),
        slug: slug.to_string(),
    }
}
