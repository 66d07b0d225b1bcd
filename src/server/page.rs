use crate::{
    divination::SessionState,
    notify::{Notice, NoticeLevel},
};

/// Everything the page needs, captured at render time.
#[derive(Debug, Clone)]
pub struct PageView {
    pub session: SessionState,
    pub has_credential: bool,
    pub notices: Vec<Notice>,
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_page(view: &PageView) -> String {
    let mut body = String::new();

    body.push_str(
        r#"<header>
  <h1>&#9733; The AI Pocket Diviner &#9733;</h1>
  <p class="tagline">Whisper a fragment of your day, receive a spark of serendipity</p>
</header>
"#,
    );

    body.push_str(&render_notices(&view.notices));

    if view.session.show_credential_form {
        body.push_str(
            r#"<section class="card credential">
  <h3>Cosmic Connection Required</h3>
  <p>To divine the patterns, please provide your Google AI API key. It will be stored locally on this machine.</p>
  <form method="post" action="/credential">
    <input type="password" name="api_key" placeholder="Your Google AI API key..." autocomplete="off">
    <button type="submit">Save</button>
  </form>
</section>
"#,
        );
    }

    body.push_str(&render_divination(&view.session));

    if !view.session.show_credential_form {
        let label = if view.has_credential {
            "Update API Key"
        } else {
            "Set API Key"
        };
        body.push_str(&format!(
            "<p class=\"center\"><a class=\"ghost\" href=\"/credential\">{label}</a></p>\n"
        ));
    }

    body.push_str(
        r#"<footer>
  <p>&#10024; For entertainment and inspiration only. The universe speaks in riddles. &#10024;</p>
  <p class="small">Your API key is stored locally and never shared</p>
</footer>
"#,
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>The AI Pocket Diviner</title>
<style>{STYLE}</style>
</head>
<body>
<main>
{body}</main>
</body>
</html>
"#
    )
}

fn render_notices(notices: &[Notice]) -> String {
    let mut html = String::new();
    for notice in notices {
        let class = match notice.level {
            NoticeLevel::Success => "toast success",
            NoticeLevel::Error => "toast error",
        };
        html.push_str(&format!(
            "<div class=\"{class}\" role=\"status\">{}</div>\n",
            escape_html(&notice.message)
        ));
    }
    html
}

fn render_divination(session: &SessionState) -> String {
    let disabled = if session.is_loading { " disabled" } else { "" };
    let button = if session.is_loading {
        r#"<span class="spinner">&#9711;</span> Consulting the Patterns..."#
    } else {
        "Divine a Spark"
    };

    let mut html = format!(
        r#"<section class="card">
  <h2>Seed of Serendipity</h2>
  <form method="post" action="/divine">
    <input type="text" name="seed" value="{seed}" placeholder="A color I see... A word I just heard... An object nearby..."{disabled}>
    <button type="submit"{disabled}>{button}</button>
  </form>
"#,
        seed = escape_html(&session.seed),
    );

    if session.omen.is_some() || session.is_loading {
        html.push_str("  <hr>\n  <h3 class=\"gold\">Your Micro-Omen</h3>\n");
        if let Some(omen) = &session.omen {
            if let Some(icon) = &session.icon {
                html.push_str(&format!(
                    "  <img class=\"icon\" src=\"{}\" alt=\"Symbolic Icon\" width=\"64\" height=\"64\">\n",
                    escape_html(icon.data_uri())
                ));
            }
            html.push_str(&format!(
                "  <blockquote>\"{}\"</blockquote>\n",
                escape_html(omen)
            ));
        }
    }

    html.push_str("</section>\n");
    html
}

const STYLE: &str = "body{margin:0;min-height:100vh;display:flex;align-items:center;justify-content:center;\
background:linear-gradient(135deg,#0f172a,#581c87,#0f172a);color:#e9d5ff;font-family:Georgia,serif}\
main{width:100%;max-width:42rem;padding:1rem}header,footer,.center{text-align:center}\
h1{color:#facc15}.tagline{color:#e9d5ff}.card{background:rgba(0,0,0,.3);border:1px solid rgba(168,85,247,.3);\
border-radius:.75rem;padding:2rem;margin:1.5rem 0;text-align:center}input{width:90%;padding:.75rem;\
background:rgba(0,0,0,.5);border:1px solid rgba(168,85,247,.5);color:#f3e8ff;text-align:center}\
button{margin-top:1rem;padding:.75rem 2rem;background:linear-gradient(90deg,#9333ea,#2563eb);color:#fff;border:0}\
button[disabled]{opacity:.5}.gold{color:#facc15}blockquote{font-size:1.4rem;font-style:italic}\
.icon{opacity:.8}.ghost{color:#c084fc}.toast{padding:.75rem;border-radius:.5rem;margin:.5rem 0}\
.success{background:#14532d}.error{background:#7f1d1d}.small{font-size:.75rem;color:#a855f7}";
