//! HTML helpers shared by the page routes.
//!
//! Pages are assembled from string constants and `format!`; every value
//! that came from a visitor goes through [`escape`] first.

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap a `<body>` fragment in the shared document head and stylesheet.
#[must_use]
pub fn document(title: &str, body: &str) -> String {
    let mut html = String::with_capacity(HEAD.len() + STYLE.len() + body.len() + 64);
    html.push_str(&HEAD.replace("{{TITLE}}", &escape(title)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    html.push_str("\n</body></html>\n");
    html
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{{TITLE}}</title>
"#;

/// Stylesheet for the landing page and admin overlay.
const STYLE: &str = r"<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{--slate:#0f172a;--slate-600:#475569;--slate-200:#e2e8f0;--emerald:#10b981;--emerald-dark:#059669;--red:#ef4444;--font:-apple-system,'Segoe UI',Roboto,sans-serif}
body{font-family:var(--font);background:#fff;color:var(--slate);line-height:1.6}
a{color:inherit;text-decoration:none}
.header{background:var(--slate);color:#fff;padding:16px}
.wrap{max-width:1000px;margin:0 auto;display:flex;justify-content:space-between;align-items:center}
.logo{font-weight:800;font-size:20px;letter-spacing:-.5px}
.btn{display:inline-block;background:var(--emerald);color:#fff;padding:10px 20px;border-radius:8px;font-weight:600;border:none;cursor:pointer;font-size:14px}
.btn:hover{background:var(--emerald-dark)}
.btn-danger{background:var(--red)}
.btn-danger:hover{background:#dc2626}
.hero{background:linear-gradient(135deg,#0f172a,#1e293b);color:#fff;text-align:center;padding:80px 16px}
.hero h1{font-size:48px;font-weight:800;line-height:1.1;margin-bottom:16px}
.hero p{color:#cbd5e1;font-size:18px;max-width:560px;margin:0 auto 32px}
.offer{display:inline-block;background:rgba(16,185,129,.15);border:1px solid rgba(16,185,129,.4);border-radius:12px;padding:12px 20px;margin-bottom:28px}
.offer strong{display:block;color:#6ee7b7}
section{padding:64px 16px}
section h2{text-align:center;font-size:32px;font-weight:800;margin-bottom:32px}
.grid{max-width:1000px;margin:0 auto;display:grid;grid-template-columns:repeat(3,1fr);gap:20px}
.card{border:1px solid var(--slate-200);border-radius:12px;padding:24px;text-align:center}
.step{width:40px;height:40px;border-radius:50%;background:var(--emerald);color:#fff;display:flex;align-items:center;justify-content:center;margin:0 auto 12px;font-weight:700}
.badges{max-width:1000px;margin:0 auto;display:grid;grid-template-columns:repeat(4,1fr);gap:16px;text-align:center;font-weight:600}
.faq{max-width:720px;margin:0 auto}
.faq-item{border:1px solid var(--slate-200);border-radius:10px;margin-bottom:12px}
.faq-item a{display:flex;justify-content:space-between;padding:16px 20px;font-weight:600}
.faq-item p{padding:0 20px 16px;color:var(--slate-600)}
.waitlist{background:#f8fafc}
.waitlist form{max-width:440px;margin:0 auto;display:flex;flex-direction:column;gap:12px}
.waitlist input{padding:12px;border:1px solid #cbd5e1;border-radius:8px;font-size:15px}
.muted{text-align:center;color:var(--slate-600);margin-bottom:20px}
.notice{max-width:440px;margin:0 auto 16px;padding:12px 16px;border-radius:8px}
.notice-ok{background:#ecfdf5;border:1px solid #6ee7b7;text-align:center}
.notice-err{background:#fef2f2;border:1px solid #fca5a5}
.footer{background:var(--slate);color:#94a3b8;text-align:center;padding:24px;font-size:13px}
.admin-toggle{position:fixed;bottom:16px;right:16px;background:#1e293b;color:#fff;border-radius:50%;width:48px;height:48px;display:flex;align-items:center;justify-content:center}
.overlay{position:fixed;inset:0;background:rgba(0,0,0,.5);display:flex;align-items:center;justify-content:center;padding:16px}
.panel{background:#fff;border-radius:10px;max-width:960px;width:100%;max-height:90vh;overflow:hidden}
.panel-head{background:var(--slate);color:#fff;padding:16px;display:flex;justify-content:space-between;align-items:center}
.panel-body{padding:24px;overflow:auto;max-height:70vh}
.panel-body form.login{max-width:320px;margin:0 auto;display:flex;flex-direction:column;gap:12px}
.panel-body input{padding:10px;border:1px solid #cbd5e1;border-radius:8px}
.actions{display:flex;gap:8px}
table{width:100%;border-collapse:collapse;margin-top:20px}
th,td{border:1px solid var(--slate-200);padding:8px 12px;text-align:left}
th{background:#f8fafc}
@media(max-width:768px){.hero h1{font-size:32px}.grid,.badges{grid-template-columns:1fr}}
</style>
";
