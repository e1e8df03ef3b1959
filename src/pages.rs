//! Server-rendered HTML for the listing and admin pages.

use crate::core::catalog::filter::facet_label;
use crate::core::catalog::models::{WebsiteEntry, WebsiteFields, DEFAULT_STYLE, STYLE_PRESETS};
use crate::core::config::{DEFAULT_ICON_PATH, LOGO_PATH};
use crate::core::view::admin::{AdminView, EditTarget, FormState, Notice, NoticeKind};
use crate::core::view::listing::ListingView;
use crate::core::view::LoadState;

const PAGE_TITLE: &str = "TSOK Portal - Teachers Specialists Organization Kuwait";
const PAGE_DESCRIPTION: &str = "Central portal for all TSOK websites and applications";
const THEME_COLOR: &str = "#1e3a8a";
const ORGANIZATION: &str = "Teachers Specialists Organization Kuwait";

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no">
<meta name="description" content="{PAGE_DESCRIPTION}">
<meta name="theme-color" content="{THEME_COLOR}">
<meta name="apple-mobile-web-app-capable" content="yes">
<meta name="apple-mobile-web-app-status-bar-style" content="default">
<meta name="apple-mobile-web-app-title" content="TSOK Portal">
<link rel="manifest" href="/manifest.json">
<link rel="icon" href="/favicon.ico">
<link rel="apple-touch-icon" href="/apple-icon.png">
<title>{PAGE_TITLE}</title>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn card_style(entry: &WebsiteEntry) -> &str {
    if entry.fields.style.trim().is_empty() {
        DEFAULT_STYLE
    } else {
        &entry.fields.style
    }
}

fn render_notice(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => {
            let class = match notice.kind {
                NoticeKind::Success => "notice notice-success",
                NoticeKind::Error => "notice notice-error",
            };
            format!(
                r#"<div class="{class}" role="alert">{}</div>"#,
                escape_html(&notice.message)
            )
        }
        None => String::new(),
    }
}

pub fn render_listing(view: &ListingView) -> String {
    let search = escape_html(view.search_text());
    let category = escape_html(view.category());

    let mut facets = String::new();
    for facet in view.facets() {
        let class = if facet == view.category() {
            "facet facet-active"
        } else {
            "facet"
        };
        facets.push_str(&format!(
            r#"<button type="submit" name="category" value="{}" class="{class}">{}</button>"#,
            escape_html(&facet),
            escape_html(&facet_label(&facet))
        ));
    }

    let results = match view.state() {
        // Pages are rendered after the load settles; an unloaded view has no results.
        LoadState::Loading => String::new(),
        LoadState::Failed(_) => r#"<div class="load-error" role="alert">
<h3>Websites could not be loaded</h3>
<p>The catalog is temporarily unavailable. Please try again later.</p>
</div>"#
            .to_string(),
        LoadState::Loaded(_) => {
            let visible = view.visible_entries();
            if visible.is_empty() {
                r#"<div class="empty">
<h3>No websites found</h3>
<p>Try adjusting your search or filters</p>
</div>"#
                    .to_string()
            } else {
                let cards: String = visible.iter().map(render_card).collect();
                format!(r#"<div class="grid">{cards}</div>"#)
            }
        }
    };

    layout(&format!(
        r#"<header>
<img src="{LOGO_PATH}" alt="TSOK Logo" width="80" height="80">
<div><h1>TSOK HUB</h1><p>{ORGANIZATION}</p></div>
</header>
<main>
<form method="get" action="/" class="search">
<input type="text" name="q" value="{search}" placeholder="Search websites...">
<input type="hidden" name="category" value="{category}">
</form>
<form method="get" action="/" class="facets">
<input type="hidden" name="q" value="{search}">
{facets}
</form>
{results}
</main>
<footer>
<p>&copy; 2024 TSOK - {ORGANIZATION}</p>
</footer>"#
    ))
}

fn render_card(entry: &WebsiteEntry) -> String {
    let title = escape_html(&entry.fields.title);
    let new_badge = if entry.fields.is_new {
        r#"<span class="badge badge-new">NEW</span>"#
    } else {
        ""
    };
    format!(
        r#"<a href="{url}" target="_blank" rel="noopener noreferrer" class="card-link">
<div class="card {style}">
<img src="{icon}" alt="{title}" width="96" height="96">
<h3>{title}</h3>
<p>{description}</p>
<div class="badges"><span class="badge badge-category">{category}</span>{new_badge}</div>
</div>
</a>"#,
        url = escape_html(&entry.fields.url),
        style = escape_html(card_style(entry)),
        icon = escape_html(entry.icon_or(DEFAULT_ICON_PATH)),
        description = escape_html(&entry.fields.description),
        category = escape_html(&entry.fields.category),
    )
}

pub fn render_login(notice: Option<&Notice>) -> String {
    let notice = render_notice(notice);
    layout(&format!(
        r#"<main class="login">
<img src="{LOGO_PATH}" alt="TSOK" width="100" height="100">
<h1>Admin Login</h1>
<p>Enter password to access admin panel</p>
{notice}
<form method="post" action="/admin/login">
<input type="password" name="password" placeholder="Enter password" autofocus>
<button type="submit">Login</button>
</form>
</main>"#
    ))
}

pub fn render_dashboard(view: &AdminView, notice: Option<&Notice>) -> String {
    let notice = render_notice(notice);
    let load_error = match view.load_error() {
        Some(_) => r#"<div class="notice notice-error" role="alert">The website list could not be refreshed. Showing the last loaded list.</div>"#,
        None => "",
    };
    let toggle = match view.form() {
        FormState::Idle => {
            r#"<form method="post" action="/admin/form/new"><button type="submit">+ Add New Website</button></form>"#
        }
        FormState::Editing { .. } => {
            r#"<form method="post" action="/admin/form/cancel"><button type="submit">&#10005; Cancel</button></form>"#
        }
    };
    let form = match view.form() {
        FormState::Idle => String::new(),
        FormState::Editing { target, draft } => render_entry_form(target, draft),
    };
    let rows: String = view.entries().iter().map(render_admin_row).collect();

    layout(&format!(
        r#"<header>
<img src="{LOGO_PATH}" alt="TSOK" width="60" height="60">
<div><h1>Admin Panel</h1><p>Manage TSOK websites</p></div>
<nav>
<a href="/">View Site</a>
<form method="post" action="/admin/logout"><button type="submit">Logout</button></form>
</nav>
</header>
<main>
{notice}
{load_error}
{toggle}
{form}
<section class="admin-list">
<h2>All Websites ({count})</h2>
{rows}
</section>
</main>"#,
        count = view.entries().len(),
    ))
}

fn render_entry_form(target: &EditTarget, draft: &WebsiteFields) -> String {
    let (heading, submit, cancel) = match target {
        EditTarget::New => ("Add New Website", "Add Website", ""),
        EditTarget::Existing(_) => (
            "Edit Website",
            "Update Website",
            r#"<button type="submit" formaction="/admin/form/cancel" formnovalidate>Cancel Edit</button>"#,
        ),
    };

    let mut style_options = String::new();
    let mut preset_selected = false;
    for preset in STYLE_PRESETS {
        let selected = if preset.value == draft.style {
            preset_selected = true;
            " selected"
        } else {
            ""
        };
        style_options.push_str(&format!(
            r#"<option value="{}"{selected}>{}</option>"#,
            escape_html(preset.value),
            escape_html(preset.label)
        ));
    }
    if !preset_selected && !draft.style.is_empty() {
        let custom = escape_html(&draft.style);
        style_options.push_str(&format!(
            r#"<option value="{custom}" selected>Custom ({custom})</option>"#
        ));
    }
    let checked = if draft.is_new { " checked" } else { "" };

    format!(
        r#"<section class="entry-form">
<h2>{heading}</h2>
<form method="post" action="/admin/entries">
<label>Title * <input type="text" name="title" value="{title}" required></label>
<label>URL * <input type="url" name="url" value="{url}" placeholder="https://example.com" required></label>
<label>Description * <textarea name="description" rows="3" required>{description}</textarea></label>
<label>Icon URL (Optional - Uses TSOK logo if empty) <input type="url" name="icon" value="{icon}" placeholder="https://example.com/icon.png"></label>
<label>Category * <input type="text" name="category" value="{category}" placeholder="education, tools, etc." required></label>
<label>Order <input type="number" name="order" value="{order}"></label>
<label>Card Style <select name="style">{style_options}</select></label>
<label><input type="checkbox" name="is_new" value="on"{checked}> Mark as NEW</label>
<button type="submit">{submit}</button>
{cancel}
</form>
</section>"#,
        title = escape_html(&draft.title),
        url = escape_html(&draft.url),
        description = escape_html(&draft.description),
        icon = escape_html(&draft.icon),
        category = escape_html(&draft.category),
        order = draft.order,
    )
}

fn render_admin_row(entry: &WebsiteEntry) -> String {
    let id = escape_html(&entry.id);
    let title = escape_html(&entry.fields.title);
    let new_badge = if entry.fields.is_new {
        r#"<span class="badge badge-new">NEW</span>"#
    } else {
        ""
    };
    format!(
        r#"<div class="admin-row">
<img src="{icon}" alt="{title}" width="40" height="40">
<div><h3>{title}</h3><p>{category}</p></div>{new_badge}
<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>
<form method="post" action="/admin/form/edit/{id}"><button type="submit">Edit</button></form>
<form method="post" action="/admin/entries/{id}/delete"><button type="submit">Delete</button></form>
</div>"#,
        icon = escape_html(entry.icon_or(DEFAULT_ICON_PATH)),
        category = escape_html(&entry.fields.category),
        url = escape_html(&entry.fields.url),
    )
}

/// Confirmation step shown before a delete is carried out.
pub fn render_delete_confirmation(entry: &WebsiteEntry) -> String {
    let id = escape_html(&entry.id);
    layout(&format!(
        r#"<main class="confirm">
<h1>Delete website</h1>
<p>Are you sure you want to delete this website?</p>
<p><strong>{title}</strong></p>
<form method="post" action="/admin/entries/{id}/delete">
<input type="hidden" name="confirm" value="yes">
<button type="submit">Delete</button>
</form>
<a href="/admin">Cancel</a>
</main>"#,
        title = escape_html(&entry.fields.title),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str, category: &str) -> WebsiteEntry {
        WebsiteEntry {
            id: id.to_string(),
            fields: WebsiteFields {
                title: title.to_string(),
                description: format!("{title} description"),
                url: format!("https://{id}.example.com"),
                category: category.to_string(),
                ..WebsiteFields::default()
            },
        }
    }

    fn loaded(entries: Vec<WebsiteEntry>) -> ListingView {
        let mut view = ListingView::new();
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(entries));
        view
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn listing_renders_cards_with_default_icon_and_badges() {
        let mut fresh = entry("a", "Foo", "tools");
        fresh.fields.is_new = true;
        let html = render_listing(&loaded(vec![fresh, entry("b", "Bar", "edu")]));

        assert!(html.contains("<h3>Foo</h3>"));
        assert!(html.contains("<h3>Bar</h3>"));
        assert!(html.contains(r#"src="/icon-192.png""#));
        assert!(html.contains("badge-new"));
        assert!(html.contains(r#"value="tools" class="facet">Tools</button>"#));
        assert!(html.contains(r#"value="all" class="facet facet-active">All</button>"#));
    }

    #[test]
    fn listing_escapes_entry_content() {
        let html = render_listing(&loaded(vec![entry("a", "<script>x</script>", "tools")]));
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn listing_distinguishes_failure_from_empty_results() {
        let empty = render_listing(&loaded(Vec::new()));
        assert!(empty.contains("No websites found"));

        let mut failed = ListingView::new();
        let ticket = failed.begin_load();
        failed.finish_load(
            ticket,
            Err(crate::core::catalog::CatalogError::StoreUnavailable(
                crate::core::store::StoreError::HttpStatus(503),
            )),
        );
        let html = render_listing(&failed);
        assert!(html.contains("could not be loaded"));
        assert!(!html.contains("No websites found"));
    }

    #[test]
    fn unloaded_listing_renders_no_results_block() {
        let html = render_listing(&ListingView::new());
        assert!(!html.contains("No websites found"));
        assert!(!html.contains("could not be loaded"));
        assert!(!html.contains(r#"class="grid""#));
    }

    #[test]
    fn entry_form_marks_selected_style_and_keeps_custom_values() {
        let mut draft = WebsiteFields::default();
        let html = render_entry_form(&EditTarget::New, &draft);
        assert!(html.contains(r#"selected>Default (Blue)</option>"#));
        assert!(html.contains("Add Website"));
        assert!(!html.contains("Cancel Edit"));

        draft.style = "my-custom-card".to_string();
        let html = render_entry_form(&EditTarget::Existing("a".to_string()), &draft);
        assert!(html.contains(r#"<option value="my-custom-card" selected>"#));
        assert!(html.contains("Update Website"));
        assert!(html.contains("Cancel Edit"));
    }
}
