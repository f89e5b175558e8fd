use crate::stats::LanguageTotals;
use serde::Deserialize;

const CARD_WIDTH: u32 = 400;
const EMPTY_CARD_HEIGHT: u32 = 80;

const BAR_MAX_WIDTH: f64 = 260.0;
const BAR_HEIGHT: u32 = 16;
const LINE_GAP: u32 = 10;
const TOP_MARGIN: u32 = 40;
const BOTTOM_PADDING: u32 = 20;
const LEFT_MARGIN: u32 = 20;

/// Default number of languages drawn on a card.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub border: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub label: &'static str,
    pub percent: &'static str,
    pub track: &'static str,
    pub bar: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Light => ThemeColors {
                bg: "#fff",
                border: "#e4e2e2",
                title: "#000",
                subtitle: "#555",
                label: "#333",
                percent: "#000",
                track: "#f0f0f0",
                bar: "#4c9aff",
            },
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                border: "#30363d",
                title: "#c9d1d9",
                subtitle: "#8b949e",
                label: "#c9d1d9",
                percent: "#a5d6ff",
                track: "#21262d",
                bar: "#ffa657",
            },
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Card height for `num_langs` bars.
pub fn card_height(num_langs: usize) -> u32 {
    TOP_MARGIN + num_langs as u32 * (BAR_HEIGHT + LINE_GAP) + BOTTOM_PADDING
}

/// The `top_n` largest languages, by bytes descending. Ties keep map order.
fn top_languages(totals: &LanguageTotals, top_n: usize) -> Vec<(&str, u64)> {
    let mut sorted: Vec<(&str, u64)> = totals.iter().map(|(l, b)| (l.as_str(), *b)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(top_n);
    sorted
}

fn share(bytes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        bytes as f64 / total as f64
    }
}

fn style_block(colors: &ThemeColors) -> String {
    format!(
        r#"<style>
.title {{ font: 600 16px sans-serif; fill: {title}; }}
.subtitle {{ font: 400 12px sans-serif; fill: {subtitle}; }}
.label {{ font: 400 11px sans-serif; fill: {label}; }}
.percent {{ font: 600 11px sans-serif; fill: {percent}; }}
</style>"#,
        title = colors.title,
        subtitle = colors.subtitle,
        label = colors.label,
        percent = colors.percent,
    )
}

fn empty_card(username: &str, colors: &ThemeColors) -> String {
    format!(
        r#"<svg width="{CARD_WIDTH}" height="{EMPTY_CARD_HEIGHT}" xmlns="http://www.w3.org/2000/svg">
{style}
<rect width="100%" height="100%" rx="10" ry="10" fill="{bg}" stroke="{border}"/>
<text x="{LEFT_MARGIN}" y="35" class="title">Top Languages</text>
<text x="{LEFT_MARGIN}" y="55" class="subtitle">@{user} has no language data.</text>
</svg>"#,
        style = style_block(colors),
        bg = colors.bg,
        border = colors.border,
        user = escape_xml(username),
    )
}

/// Render the top-languages card for `username`.
pub fn generate_svg(
    username: &str,
    totals: &LanguageTotals,
    top_n: usize,
    theme: Theme,
) -> String {
    let colors = theme.colors();

    if totals.is_empty() {
        return empty_card(username, &colors);
    }

    let total_bytes: u64 = totals.values().fold(0u64, |acc, b| acc.saturating_add(*b));
    let langs = top_languages(totals, top_n);
    let height = card_height(langs.len());

    let mut parts = vec![
        format!(
            r#"<svg width="{CARD_WIDTH}" height="{height}" xmlns="http://www.w3.org/2000/svg">"#
        ),
        style_block(&colors),
        format!(
            r#"<rect width="100%" height="100%" rx="10" ry="10" fill="{}" stroke="{}"/>"#,
            colors.bg, colors.border
        ),
        format!(r#"<text x="{LEFT_MARGIN}" y="25" class="title">Top Languages</text>"#),
        format!(
            r#"<text x="{LEFT_MARGIN}" y="40" class="subtitle">@{}</text>"#,
            escape_xml(username)
        ),
    ];

    let mut y = TOP_MARGIN;
    for (lang, bytes) in langs {
        let fraction = share(bytes, total_bytes);
        let percent = fraction * 100.0;
        let bar_width = BAR_MAX_WIDTH * fraction;
        let text_y = y + BAR_HEIGHT - 4;

        // track
        parts.push(format!(
            r#"<rect x="{LEFT_MARGIN}" y="{y}" width="{BAR_MAX_WIDTH}" height="{BAR_HEIGHT}" fill="{}" rx="5" ry="5" />"#,
            colors.track
        ));
        parts.push(format!(
            r#"<rect x="{LEFT_MARGIN}" y="{y}" width="{bar_width:.2}" height="{BAR_HEIGHT}" fill="{}" rx="5" ry="5" />"#,
            colors.bar
        ));
        parts.push(format!(
            r#"<text x="{}" y="{text_y}" class="label">{}</text>"#,
            LEFT_MARGIN + 5,
            escape_xml(lang)
        ));
        parts.push(format!(
            r#"<text x="{}" y="{text_y}" class="percent">{percent:.1}%</text>"#,
            LEFT_MARGIN as f64 + BAR_MAX_WIDTH + 10.0
        ));

        y += BAR_HEIGHT + LINE_GAP;
    }

    parts.push("</svg>".to_string());
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(langs: &[(&str, u64)]) -> LanguageTotals {
        langs.iter().map(|(l, b)| (l.to_string(), *b)).collect()
    }

    /// Widths of the foreground bars, in drawing order.
    fn bar_widths(svg: &str) -> Vec<f64> {
        svg.lines()
            .filter(|l| l.contains("fill=\"#4c9aff\""))
            .filter_map(|l| l.split("width=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .map(|w| w.parse().unwrap())
            .collect()
    }

    fn labels(svg: &str) -> Vec<String> {
        svg.lines()
            .filter(|l| l.contains(r#"class="label""#))
            .filter_map(|l| l.split('>').nth(1))
            .filter_map(|rest| rest.split('<').next())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn empty_totals_render_no_data_card() {
        let svg = generate_svg("octocat", &LanguageTotals::new(), DEFAULT_TOP_N, Theme::Light);

        assert!(svg.starts_with(r#"<svg width="400" height="80""#));
        assert!(svg.contains("@octocat has no language data."));
        assert!(!svg.contains(r#"class="label""#));
    }

    #[test]
    fn shares_of_python_html_css() {
        let svg = generate_svg(
            "octocat",
            &totals(&[("Python", 300), ("HTML", 100), ("CSS", 100)]),
            DEFAULT_TOP_N,
            Theme::Light,
        );

        assert!(svg.contains(">60.0%<"));
        assert_eq!(svg.matches(">20.0%<").count(), 2);
        assert!(svg.contains(r#"height="138""#));

        let widths = bar_widths(&svg);
        assert_eq!(widths, vec![156.0, 52.0, 52.0]);
        assert_eq!(labels(&svg)[0], "Python");
    }

    #[test]
    fn only_top_n_languages_are_drawn() {
        let svg = generate_svg(
            "octocat",
            &totals(&[
                ("Rust", 700),
                ("Go", 600),
                ("C", 500),
                ("Zig", 400),
                ("Nix", 300),
                ("Lua", 200),
                ("Perl", 100),
            ]),
            5,
            Theme::Light,
        );

        assert_eq!(labels(&svg), ["Rust", "Go", "C", "Zig", "Nix"]);
        assert!(!svg.contains("Lua"));
        assert!(!svg.contains("Perl"));
    }

    #[test]
    fn bars_never_exceed_the_track() {
        let svg = generate_svg(
            "octocat",
            &totals(&[("Rust", 1), ("Go", 999_999), ("C", 3)]),
            DEFAULT_TOP_N,
            Theme::Light,
        );
        for w in bar_widths(&svg) {
            assert!(w <= BAR_MAX_WIDTH);
        }

        let single = generate_svg("octocat", &totals(&[("Rust", 10)]), 5, Theme::Light);
        assert_eq!(bar_widths(&single), vec![260.0]);
        assert!(single.contains(">100.0%<"));
    }

    #[test]
    fn height_grows_with_language_count() {
        let heights: Vec<u32> = (0..=DEFAULT_TOP_N).map(card_height).collect();
        assert!(heights.windows(2).all(|w| w[0] < w[1]));

        // capped at top_n
        let many: LanguageTotals = (0..20).map(|i| (format!("L{i}"), i + 1)).collect();
        let svg = generate_svg("octocat", &many, 3, Theme::Light);
        assert!(svg.contains(&format!(r#"height="{}""#, card_height(3))));
    }

    #[test]
    fn rounded_percentages_may_not_sum_to_100() {
        // 33.3 * 3 = 99.9, displayed as-is
        let svg = generate_svg(
            "octocat",
            &totals(&[("A", 1), ("B", 1), ("C", 1)]),
            DEFAULT_TOP_N,
            Theme::Light,
        );
        assert_eq!(svg.matches(">33.3%<").count(), 3);
    }

    #[test]
    fn zero_byte_languages_render_empty_bars() {
        let svg = generate_svg("octocat", &totals(&[("Text", 0)]), 5, Theme::Light);
        assert_eq!(bar_widths(&svg), vec![0.0]);
        assert!(svg.contains(">0.0%<"));
    }

    #[test]
    fn equal_byte_counts_keep_alphabetical_order() {
        let svg = generate_svg(
            "octocat",
            &totals(&[("Go", 100), ("C", 100), ("Rust", 100), ("Zig", 50)]),
            2,
            Theme::Light,
        );

        assert_eq!(labels(&svg), ["C", "Go"]);
        assert!(!svg.contains("Rust"));
    }

    #[test]
    fn text_is_xml_escaped() {
        let svg = generate_svg(
            "<script>",
            &totals(&[("C&C++", 10)]),
            5,
            Theme::Light,
        );
        assert!(svg.contains("@&lt;script&gt;"));
        assert!(svg.contains(">C&amp;C++<"));
    }

    #[test]
    fn dark_theme_swaps_palette() {
        let svg = generate_svg("octocat", &totals(&[("Rust", 1)]), 5, Theme::Dark);
        assert!(svg.contains("#161b22"));
        assert!(!svg.contains("#4c9aff"));
    }
}
