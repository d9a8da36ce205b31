//! The project gallery.
//!
//! Renders the `media/home` index into a card per project. Each card is
//! composed from the same small set of builders: a thumbnail (image, video
//! or placeholder), an expanded description, a fixed-order action list, and
//! optionally a tab strip for sub-folders or a workshop chip selector.
//!
//! Tab and chip interactions are modeled as pure subtree swaps on the card
//! element driven by explicit state values, so they can be exercised without
//! a live document.

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::warn;

use crate::content::{ProjectContent, ProjectIndex, Workshop};
use crate::fetch::{Fetcher, is_external_url};
use crate::html::{Element, message};
use crate::markup;

/// Section rendered on the gallery page.
pub const SECTION_HOME: &str = "home";

const MSG_NO_INDEX: &str = "No media index found. Create media/home/index.json listing folders.";
const MSG_NO_PROJECTS: &str = "No projects available.";

fn index_path(section: &str) -> String {
    format!("media/{section}/index.json")
}

fn content_base(section: &str, name: &str) -> String {
    format!("media/{section}/{name}")
}

/// Renders the whole gallery container for a section.
///
/// Every project listed in the index is fetched independently and
/// concurrently; the result is joined before any card is appended, so cards
/// always appear in index order, never in completion order. Projects whose
/// descriptor cannot be loaded are skipped.
pub fn render(fetcher: &Fetcher, section: &str) -> Element {
    let gallery = Element::new("main").attr("id", "gallery").class("gallery");

    let projects = fetcher
        .json::<ProjectIndex>(index_path(section))
        .and_then(|index| index.projects);
    let Some(projects) = projects else {
        return gallery.child(message(MSG_NO_INDEX));
    };

    let bar = ProgressBar::new(projects.len() as u64).with_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("Error setting progress bar template")
            .progress_chars("#>-"),
    );

    let cards: Vec<Option<Element>> = projects
        .par_iter()
        .progress_with(bar)
        .map(|name| load_project(fetcher, name, section))
        .collect();

    let cards: Vec<Element> = cards.into_iter().flatten().collect();
    if cards.is_empty() {
        return gallery.child(message(MSG_NO_PROJECTS));
    }

    gallery.children(cards.into_iter().map(Into::into))
}

/// Builds the full card for one project, or `None` when its descriptor is
/// missing.
pub fn load_project(fetcher: &Fetcher, name: &str, section: &str) -> Option<Element> {
    let base = content_base(section, name);
    let Some(content) = fetcher.json::<ProjectContent>(format!("{base}/content.json")) else {
        warn!("Missing content.json for {name}");
        return None;
    };

    let subfolders = content.subfolders().to_vec();

    // A project with sub-folders sources its primary content from the first
    // one, while still listing a switchable tab per sub-folder.
    let (actual, actual_base, display_name) = match subfolders.first() {
        Some(first) => {
            let nested = format!("{base}/{first}");
            let nested_content = fetcher
                .json(format!("{nested}/content.json"))
                .unwrap_or_else(|| content.clone());
            (nested_content, nested, format!("{name} — {first}"))
        }
        None => (content.clone(), base, name.to_string()),
    };

    let description = Element::new("p").raw(markup::expand(
        actual.description.as_deref().unwrap_or_default(),
    ));

    let content_el = Element::new("div")
        .class("content")
        .child(Element::new("h3").text(name))
        .maybe((!subfolders.is_empty()).then(|| tab_strip(&subfolders, 0)))
        .child(Element::new("div").class("meta").text(&display_name))
        .child(description)
        .child(actions(&actual, &actual_base))
        .maybe(actual.customer_workshops.as_deref().map(workshop_selector));

    let mut card = Element::new("article")
        .class("card")
        .child(thumbnail(&actual, &actual_base, &display_name))
        .maybe(second_thumbnail(&actual, &actual_base))
        .child(content_el);
    card.toggle_class("two-thumbs", actual.image_2.is_some());

    Some(card)
}

/// Composes the primary thumbnail: image if present, else inline video,
/// else a placeholder.
pub fn thumbnail(content: &ProjectContent, base: &str, name: &str) -> Element {
    let thumb = Element::new("div").class("thumb");

    if let Some(image) = &content.image {
        thumb.child(
            Element::new("img")
                .attr("src", format!("{base}/{image}"))
                .attr("alt", content.text.as_deref().unwrap_or(name))
                .attr("loading", "lazy"),
        )
    } else if let Some(video) = &content.video {
        let src = match is_external_url(video) {
            true => video.clone(),
            false => format!("{base}/{video}"),
        };
        thumb.child(
            Element::new("video")
                .attr("src", src)
                .flag("muted")
                .flag("loop")
                .flag("autoplay"),
        )
    } else {
        thumb.child(Element::new("div").class("placeholder").text("No preview"))
    }
}

/// Composes the additive second thumbnail, present only when the descriptor
/// carries a second image. Image-only: no video or placeholder fallback.
pub fn second_thumbnail(content: &ProjectContent, base: &str) -> Option<Element> {
    content.image_2.as_ref().map(|image| {
        Element::new("img")
            .class("thumb-secondary")
            .attr("src", format!("{base}/{image}"))
            .attr("alt", content.text.as_deref().unwrap_or_default())
            .attr("loading", "lazy")
    })
}

/// Composes the action list in fixed order: link, watch-video, PDF.
///
/// The watch-video action only appears for absolute video URLs, even though
/// such a video already plays inline in the thumbnail.
pub fn actions(content: &ProjectContent, base: &str) -> Element {
    let mut actions = Element::new("div").class("actions");

    if let Some(link) = &content.link {
        actions = actions.child(action_link("Open link", link, "btn"));
    }
    if let Some(video) = content.video.as_deref().filter(|v| is_external_url(v)) {
        actions = actions.child(action_link("Watch video", video, "btn"));
    }
    if let Some(pdf) = &content.pdf {
        actions = actions.child(action_link("Open PDF", &format!("{base}/{pdf}"), "btn secondary"));
    }

    actions
}

fn action_link(text: &str, href: &str, class: &str) -> Element {
    Element::new("a")
        .class(class)
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .text(text)
}

/// Which sub-folder tab is currently active on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabState {
    pub active: usize,
}

/// Renders the tab strip for a project with sub-folders.
pub fn tab_strip(subfolders: &[String], active: usize) -> Element {
    let buttons = subfolders.iter().enumerate().map(|(i, subfolder)| {
        let button = Element::new("button")
            .class(if i == active { "tab-btn active" } else { "tab-btn" })
            .attr("data-subfolder", subfolder)
            .text(subfolder);
        button.into()
    });

    Element::new("div")
        .class("tabs-container")
        .child(Element::new("div").class("tab-buttons").children(buttons))
}

/// Applies a tab selection to a live card.
///
/// The clicked button always becomes the single active one. The card content
/// is then rebuilt from a fresh fetch of the sub-folder descriptor; when that
/// fetch fails the currently displayed content stays untouched.
pub fn switch_tab(
    card: &mut Element,
    state: &mut TabState,
    fetcher: &Fetcher,
    section: &str,
    parent: &str,
    subfolders: &[String],
    index: usize,
) {
    let Some(subfolder) = subfolders.get(index) else {
        return;
    };

    state.active = index;
    if let Some(buttons) = card.find_class_mut("tab-buttons") {
        for (i, button) in buttons.elements_mut().enumerate() {
            button.toggle_class("active", i == index);
        }
    }

    let base = format!("{}/{subfolder}", content_base(section, parent));
    let Some(content) = fetcher.json::<ProjectContent>(format!("{base}/content.json")) else {
        return;
    };

    card.replace_class("thumb", thumbnail(&content, &base, subfolder));

    // Second thumbnail: replace in place, insert after the primary thumb,
    // remove, or leave alone, depending on what the old and new content have.
    let had_second = card.find_class("thumb-secondary").is_some();
    match (had_second, second_thumbnail(&content, &base)) {
        (true, Some(new)) => {
            card.replace_class("thumb-secondary", new);
        }
        (false, Some(new)) => {
            card.insert_after_class("thumb", new);
        }
        (true, None) => {
            card.remove_class_node("thumb-secondary");
        }
        (false, None) => {}
    }
    card.toggle_class("two-thumbs", content.image_2.is_some());

    if let Some(content_el) = card.find_class_mut("content") {
        if let Some(description) = content_el.find_tag_mut("p") {
            description.set_raw(markup::expand(
                content.description.as_deref().unwrap_or_default(),
            ));
        }
    }
    if let Some(meta) = card.find_class_mut("meta") {
        meta.set_text(format!("{parent} — {subfolder}"));
    }
    card.replace_class("actions", actions(&content, &base));
}

/// Which workshop chip is currently selected on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChipState {
    pub selected: usize,
}

/// Renders the multi-choice workshop selector with the first chip selected.
pub fn workshop_selector(workshops: &[Workshop]) -> Element {
    Element::new("div")
        .class("workshops")
        .child(chip_row(workshops, 0))
        .child(chip_details(workshops, 0))
}

fn chip_row(workshops: &[Workshop], selected: usize) -> Element {
    let chips = workshops.iter().enumerate().map(|(i, workshop)| {
        let chip = Element::new("button")
            .class(if i == selected { "chip selected" } else { "chip" })
            .text(&workshop.title);
        chip.into()
    });

    Element::new("div").class("chips").children(chips)
}

fn chip_details(workshops: &[Workshop], selected: usize) -> Element {
    let pane = Element::new("div").class("chip-details");

    match workshops.get(selected) {
        Some(workshop) => {
            let topics = workshop
                .topics
                .iter()
                .map(|topic| Element::new("li").text(topic).into());
            pane.child(Element::new("h4").text(&workshop.title))
                .child(Element::new("ul").children(topics))
        }
        None => pane.child(
            Element::new("p")
                .class("placeholder")
                .text("Select a workshop"),
        ),
    }
}

/// Applies a chip selection to a live card: re-renders the chip row with
/// exactly one selected chip and swaps the details pane. An out-of-range
/// index shows the placeholder prompt instead of details.
pub fn select_chip(
    card: &mut Element,
    workshops: &[Workshop],
    state: &mut ChipState,
    index: usize,
) {
    state.selected = index;
    card.replace_class("chips", chip_row(workshops, index));
    card.replace_class("chip-details", chip_details(workshops, index));
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use camino::Utf8PathBuf;

    use super::*;

    fn content(json: &str) -> ProjectContent {
        serde_json::from_str(json).unwrap()
    }

    fn write_json(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn fetcher(dir: &tempfile::TempDir) -> Fetcher {
        Fetcher::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap())
    }

    #[test]
    fn test_thumbnail_image() {
        let thumb = thumbnail(&content(r#"{ "Image": "a.webp" }"#), "media/home/p", "p");
        assert_eq!(
            thumb.render(),
            r#"<div class="thumb"><img src="media/home/p/a.webp" alt="p" loading="lazy"></div>"#
        );
    }

    #[test]
    fn test_thumbnail_image_wins_over_video() {
        let c = content(r#"{ "Image": "a.webp", "Video": "v.mp4" }"#);
        let thumb = thumbnail(&c, "base", "p");
        assert!(thumb.render().contains("<img"));
        assert!(!thumb.render().contains("<video"));
    }

    #[test]
    fn test_thumbnail_relative_video() {
        let thumb = thumbnail(&content(r#"{ "Video": "v.mp4" }"#), "base", "p");
        assert_eq!(
            thumb.render(),
            r#"<div class="thumb"><video src="base/v.mp4" muted loop autoplay></video></div>"#
        );
    }

    #[test]
    fn test_thumbnail_absolute_video_is_verbatim() {
        let c = content(r#"{ "Video": "https://cdn.example/v.mp4" }"#);
        let thumb = thumbnail(&c, "base", "p");
        assert!(thumb.render().contains(r#"src="https://cdn.example/v.mp4""#));
    }

    #[test]
    fn test_thumbnail_placeholder() {
        let thumb = thumbnail(&content("{}"), "base", "p");
        assert_eq!(
            thumb.render(),
            r#"<div class="thumb"><div class="placeholder">No preview</div></div>"#
        );
    }

    #[test]
    fn test_thumbnail_alt_prefers_text() {
        let c = content(r#"{ "Image": "a.webp", "Text": "label" }"#);
        let thumb = thumbnail(&c, "base", "p");
        assert!(thumb.render().contains(r#"alt="label""#));
    }

    #[test]
    fn test_second_thumbnail_additive() {
        assert!(second_thumbnail(&content("{}"), "base").is_none());

        let c = content(r#"{ "image 2": "b.webp" }"#);
        let second = second_thumbnail(&c, "base").unwrap();
        assert_eq!(
            second.render(),
            r#"<img class="thumb-secondary" src="base/b.webp" alt="" loading="lazy">"#
        );
    }

    #[test]
    fn test_actions_fixed_order() {
        let c = content(
            r#"{
                "Pdf": "doc.pdf",
                "Link": "https://example.com",
                "Video": "https://cdn.example/v.mp4"
            }"#,
        );
        let html = actions(&c, "base").render();

        let link = html.find("Open link").unwrap();
        let watch = html.find("Watch video").unwrap();
        let pdf = html.find("Open PDF").unwrap();
        assert!(link < watch && watch < pdf);
        assert!(html.contains(r#"href="base/doc.pdf""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }

    #[test]
    fn test_actions_skip_relative_video() {
        let c = content(r#"{ "Video": "v.mp4" }"#);
        assert!(!actions(&c, "base").render().contains("Watch video"));
    }

    #[test]
    fn test_actions_empty_without_fields() {
        assert_eq!(actions(&content("{}"), "base").render(), r#"<div class="actions"></div>"#);
    }

    #[test]
    fn test_tab_strip_marks_first_active() {
        let subs = vec!["a".to_string(), "b".to_string()];
        let html = tab_strip(&subs, 0).render();
        assert!(html.contains(r#"<button class="tab-btn active" data-subfolder="a">a</button>"#));
        assert!(html.contains(r#"<button class="tab-btn" data-subfolder="b">b</button>"#));
    }

    #[test]
    fn test_switch_tab_swaps_content() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/proj/content.json",
            r#"{ "subfolders": ["one", "two"] }"#,
        );
        write_json(
            dir.path(),
            "media/home/proj/one/content.json",
            r#"{ "Image": "one.webp", "Description": "first" }"#,
        );
        write_json(
            dir.path(),
            "media/home/proj/two/content.json",
            r#"{ "Video": "v.mp4", "Description": "**second**", "Link": "https://x.y" }"#,
        );
        let fetcher = fetcher(&dir);

        let mut card = load_project(&fetcher, "proj", "home").unwrap();
        let mut state = TabState::default();
        assert!(card.render().contains("one.webp"));

        switch_tab(&mut card, &mut state, &fetcher, "home", "proj", &subs(), 1);

        assert_eq!(state.active, 1);
        let html = card.render();
        assert!(html.contains("media/home/proj/two/v.mp4"));
        assert!(html.contains("<strong>second</strong>"));
        assert!(html.contains("proj — two"));
        assert!(html.contains("Open link"));
        assert!(html.contains(r#"<button class="tab-btn active" data-subfolder="two">"#));
        assert!(!html.contains("one.webp"));
    }

    #[test]
    fn test_switch_tab_fetch_failure_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/proj/content.json",
            r#"{ "subfolders": ["one", "gone"] }"#,
        );
        write_json(
            dir.path(),
            "media/home/proj/one/content.json",
            r#"{ "Image": "one.webp", "Description": "first" }"#,
        );
        let fetcher = fetcher(&dir);

        let mut card = load_project(&fetcher, "proj", "home").unwrap();
        let mut state = TabState::default();

        switch_tab(
            &mut card,
            &mut state,
            &fetcher,
            "home",
            "proj",
            &["one".to_string(), "gone".to_string()],
            1,
        );

        // Buttons re-mark, content stays.
        let html = card.render();
        assert!(html.contains(r#"<button class="tab-btn active" data-subfolder="gone">"#));
        assert!(html.contains("one.webp"));
        assert!(html.contains("first"));
    }

    fn subs() -> Vec<String> {
        vec!["one".to_string(), "two".to_string()]
    }

    #[test]
    fn test_switch_tab_second_thumbnail_combinations() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/proj/content.json",
            r#"{ "subfolders": ["plain", "dual"] }"#,
        );
        write_json(
            dir.path(),
            "media/home/proj/plain/content.json",
            r#"{ "Image": "a.webp" }"#,
        );
        write_json(
            dir.path(),
            "media/home/proj/dual/content.json",
            r#"{ "Image": "a.webp", "image 2": "b.webp" }"#,
        );
        let fetcher = fetcher(&dir);
        let subs = vec!["plain".to_string(), "dual".to_string()];

        let mut card = load_project(&fetcher, "proj", "home").unwrap();
        let mut state = TabState::default();
        assert!(!card.has_class("two-thumbs"));

        // none -> some: insert after the primary thumb
        switch_tab(&mut card, &mut state, &fetcher, "home", "proj", &subs, 1);
        assert!(card.has_class("two-thumbs"));
        assert!(card.find_class("thumb-secondary").is_some());
        let html = card.render();
        let thumb = html.find(r#"<div class="thumb">"#).unwrap();
        let second = html.find("thumb-secondary").unwrap();
        assert!(thumb < second);

        // some -> some: replace in place
        switch_tab(&mut card, &mut state, &fetcher, "home", "proj", &subs, 1);
        assert!(card.has_class("two-thumbs"));
        assert_eq!(card.render().matches("thumb-secondary").count(), 1);

        // some -> none: remove
        switch_tab(&mut card, &mut state, &fetcher, "home", "proj", &subs, 0);
        assert!(!card.has_class("two-thumbs"));
        assert!(card.find_class("thumb-secondary").is_none());

        // none -> none: no-op
        switch_tab(&mut card, &mut state, &fetcher, "home", "proj", &subs, 0);
        assert!(card.find_class("thumb-secondary").is_none());
    }

    #[test]
    fn test_workshop_selector_first_selected() {
        let workshops: Vec<Workshop> = serde_json::from_str(
            r#"[
                { "title": "Intro", "topics": ["a", "b"] },
                { "title": "Deep dive", "topics": ["c"] }
            ]"#,
        )
        .unwrap();

        let html = workshop_selector(&workshops).render();
        assert!(html.contains(r#"<button class="chip selected">Intro</button>"#));
        assert!(html.contains(r#"<button class="chip">Deep dive</button>"#));
        assert!(html.contains("<h4>Intro</h4>"));
        assert!(html.contains("<li>a</li><li>b</li>"));
    }

    #[test]
    fn test_select_chip_moves_selection() {
        let workshops: Vec<Workshop> = serde_json::from_str(
            r#"[
                { "title": "Intro", "topics": ["a"] },
                { "title": "Deep dive", "topics": ["c"] }
            ]"#,
        )
        .unwrap();
        let mut card = Element::new("article").child(workshop_selector(&workshops));
        let mut state = ChipState::default();

        select_chip(&mut card, &workshops, &mut state, 1);

        let html = card.render();
        assert_eq!(state.selected, 1);
        assert_eq!(html.matches("chip selected").count(), 1);
        assert!(html.contains(r#"<button class="chip selected">Deep dive</button>"#));
        assert!(html.contains("<h4>Deep dive</h4>"));
    }

    #[test]
    fn test_select_chip_out_of_range_shows_prompt() {
        let workshops: Vec<Workshop> =
            serde_json::from_str(r#"[{ "title": "Intro", "topics": ["a"] }]"#).unwrap();
        let mut card = Element::new("article").child(workshop_selector(&workshops));
        let mut state = ChipState::default();

        select_chip(&mut card, &workshops, &mut state, 7);

        let html = card.render();
        assert!(html.contains("Select a workshop"));
        assert!(!html.contains("<h4>"));
    }

    #[test]
    fn test_render_missing_index_is_single_message() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = render(&fetcher(&dir), SECTION_HOME);
        let html = gallery.render();
        assert!(html.contains("No media index found"));
        assert!(!html.contains("article"));
    }

    #[test]
    fn test_render_index_without_projects_field() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "media/home/index.json", r#"{ "other": 1 }"#);
        let html = render(&fetcher(&dir), SECTION_HOME).render();
        assert!(html.contains("No media index found"));
    }

    #[test]
    fn test_render_drops_failed_projects_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/index.json",
            r#"{ "projects": ["a", "b", "c"] }"#,
        );
        write_json(dir.path(), "media/home/a/content.json", r#"{ "Text": "A" }"#);
        write_json(dir.path(), "media/home/c/content.json", r#"{ "Text": "C" }"#);

        let html = render(&fetcher(&dir), SECTION_HOME).render();
        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.find("<h3>a</h3>").unwrap() < html.find("<h3>c</h3>").unwrap());
        assert!(!html.contains("<h3>b</h3>"));
    }

    #[test]
    fn test_render_all_projects_missing_shows_message() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/index.json",
            r#"{ "projects": ["ghost"] }"#,
        );
        let html = render(&fetcher(&dir), SECTION_HOME).render();
        assert!(html.contains("No projects available."));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn test_card_uses_first_subfolder_content() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/proj/content.json",
            r#"{ "subfolders": ["one", "two"], "Image": "parent.webp" }"#,
        );
        write_json(
            dir.path(),
            "media/home/proj/one/content.json",
            r#"{ "Image": "one.webp" }"#,
        );
        let card = load_project(&fetcher(&dir), "proj", "home").unwrap();

        let html = card.render();
        assert!(html.contains("media/home/proj/one/one.webp"));
        assert!(!html.contains("parent.webp"));
        assert!(html.contains("proj — one"));
        assert!(html.contains("tab-buttons"));
    }

    #[test]
    fn test_card_falls_back_to_parent_when_subfolder_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "media/home/proj/content.json",
            r#"{ "subfolders": ["ghost"], "Image": "parent.webp" }"#,
        );
        let card = load_project(&fetcher(&dir), "proj", "home").unwrap();

        // Parent descriptor stands in, but the base stays nested.
        let html = card.render();
        assert!(html.contains("media/home/proj/ghost/parent.webp"));
    }

    #[test]
    fn test_card_without_description_renders_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "media/home/p/content.json", "{}");
        let card = load_project(&fetcher(&dir), "p", "home").unwrap();
        assert!(card.render().contains("<p></p>"));
    }
}
