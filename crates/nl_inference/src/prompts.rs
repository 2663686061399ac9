//! Fixed instruction templates for the three generation steps.
//!
//! Placeholders are `{name}`; [`render`] substitutes them in one pass so text
//! pulled from the web can never introduce new placeholders.

pub const SELECT_ARTICLES: &str = r#"You are a world class journalist, researcher, tech, Software Engineer, Developer, newsletter writer and a online content creator, you are amazing at finding the most interesting and relevant, useful articles in certain topics.

QUERY RESPONSE:{results}

Above is the list of search results for the query {topic}.

Please choose the best 3-5 articles from the list and return ONLY a JSON object of the form {"urls": ["..."]} holding the urls.
Do not include anything else - return ONLY the JSON.
Also make sure the articles are recent and not too old.
If the file, or URL is invalid, show www.google.com."#;

pub const SUMMARIZE: &str = r#"{docs}
As a world class journalist, researcher, tech, Software Engineer, Developer, newsletter writer and a online content creator, you will summarize the text above in order to create a newsletter around {topic}.
This newsletter will be sent as an email. The format is going to be like Tim Ferriss' "5-Bullet Friday" newsletter.

Please follow all of the following guidelines:
1/ Make sure the content is engaging, informative with good data
2/ Make sure the content is not too long, it should be the size of a nice newsletter bullet point and summary
3/ The content should address the {topic} topic very well
4/ The content needs to be good and informative
5/ The content needs to be written in a way that is easy to read, digest and understand
6/ The content needs to give the audience actionable advice & insights including resources and links if necessary

SUMMARY:"#;

pub const COMPOSE_NEWSLETTER: &str = r#"{summaries}
As a world class journalist, researcher, tech, Software Engineer, Developer, newsletter writer and a online content creator, you'll use the text above as the context about {topic} to write an excellent newsletter to be sent to subscribers about {topic}.

This newsletter will be sent as an email. The format is going to be like Tim Ferriss' "5-Bullet Friday" newsletter.

Make sure to write it in {tone} - no "Dear" or any other formalities.
Start the newsletter with
`Hi All!
  Here is your weekly dose of the Newsletter, a list of what I find interesting
  and worth and exploring.`

Make sure to also write a backstory about the topic - make it personal, engaging and lighthearted before going into the meat of the newsletter.

Please follow all of the following guidelines:
1/ Make sure the content is engaging, informative with good data
2/ Make sure the content is not too long, it should be the size of a nice newsletter bullet point and summary
3/ The content should address the {topic} topic very well
4/ The content needs to be good and informative
5/ The content needs to be written in a way that is easy to read, digest and understand
6/ The content needs to give the audience actionable advice & insights including resources and links if necessary.

If there are books, or products involved, make sure to add amazon links to the products or just a link placeholder.

As a signoff, write a clever quote related to learning, general wisdom, living a good life. Be creative with this one - and then,
Sign with "-AI Generated." IN NEW LINE.
NEWSLETTER-->:"#;

/// Replaces every `{name}` whose name appears in `values`; anything else,
/// including braces in substituted text, is copied through untouched.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match replaced {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn select_articles(results_json: &str, topic: &str) -> String {
    render(SELECT_ARTICLES, &[("results", results_json), ("topic", topic)])
}

pub fn summarize(docs: &str, topic: &str) -> String {
    render(SUMMARIZE, &[("docs", docs), ("topic", topic)])
}

pub fn compose_newsletter(summaries: &str, topic: &str, tone_description: &str) -> String {
    render(
        COMPOSE_NEWSLETTER,
        &[
            ("summaries", summaries),
            ("topic", topic),
            ("tone", tone_description),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_known_names() {
        assert_eq!(render("a {x} b {y}", &[("x", "1"), ("y", "2")]), "a 1 b 2");
    }

    #[test]
    fn test_render_leaves_unknown_braces() {
        assert_eq!(render(r#"{"urls": []} {x}"#, &[("x", "1")]), r#"{"urls": []} 1"#);
        assert_eq!(render("open { only", &[]), "open { only");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render("{docs} / {topic}", &[("docs", "see {topic}"), ("topic", "rust")]);
        assert_eq!(out, "see {topic} / rust");
    }

    #[test]
    fn test_selection_prompt_keeps_json_example() {
        let prompt = select_articles("[]", "rust");
        assert!(prompt.contains(r#"{"urls": ["..."]}"#));
        assert!(prompt.contains("search results for the query rust."));
        assert!(!prompt.contains("{results}"));
    }

    #[test]
    fn test_compose_prompt_contains_all_parts() {
        let prompt = compose_newsletter("digest text", "rust", "a calm voice");
        assert!(prompt.starts_with("digest text"));
        assert!(prompt.contains("write it in a calm voice"));
        assert!(prompt.contains("Hi All!"));
        assert!(prompt.contains("backstory"));
        assert!(prompt.contains("-AI Generated."));
        assert!(!prompt.contains("{topic}"));
    }
}
