// Dashboard shell: static HTML with a polling script that renders /api/stats client-side.
// Rendered once at startup from config; the page itself never reloads.

use serde::Serialize;

use crate::config::AppConfig;
use crate::version;

#[derive(Serialize)]
struct ProjectMeta<'a> {
    name: &'a str,
    label: &'a str,
}

/// Renders the dashboard page for the configured projects.
pub fn render(config: &AppConfig) -> String {
    let projects: Vec<ProjectMeta<'_>> = config
        .projects
        .iter()
        .map(|p| ProjectMeta {
            name: &p.name,
            label: p.label(),
        })
        .collect();
    let projects_json = serde_json::to_string(&projects).unwrap_or_else(|_| "[]".into());

    let values = [
        ("TITLE", escape_html(&config.dashboard.title)),
        ("BANNER", escape_html(&version::banner())),
        ("PROJECTS", script_safe(&projects_json)),
        (
            "REFRESH_MS",
            (config.dashboard.refresh_interval_secs * 1000).to_string(),
        ),
        ("RENDER_LINES", config.dashboard.render_lines.to_string()),
    ];
    fill_template(TEMPLATE, &values)
}

/// Replaces every `{{KEY}}` in one left-to-right pass. Inserted values are
/// never rescanned; unknown keys are copied through unchanged.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let hit = after.find("}}").and_then(|end| {
            values
                .iter()
                .find(|(key, _)| *key == &after[..end])
                .map(|(_, value)| (value, end))
        });
        match hit {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escapes text for an HTML text or attribute context.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON embedded in a <script> block must not contain `</script>` or `<!--`.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>{{TITLE}}</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body { font-family: monospace; margin: 20px; background: #1a1a1a; color: #00ff00; }
        .container { max-width: 1200px; margin: 0 auto; }
        .project { border: 1px solid #00ff00; margin: 20px 0; padding: 15px; border-radius: 5px; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 10px; }
        .stat { background: #2a2a2a; padding: 10px; border-radius: 3px; }
        .error { color: #ff4444; }
        .timestamp { color: #ffff00; }
        h1, h2 { color: #00ffff; }
        h3 { color: #ffaa00; font-size: 1em; margin: 10px 0 5px 0; }
        .refresh-btn { background: #00ff00; color: #000; border: none; padding: 10px 20px; cursor: pointer; }
        .status { font-size: 0.9em; color: #888; }
        .terminal-log { background: #1a1a1a; margin: 10px 0; padding: 10px; border-radius: 5px; border: 1px solid #333; }
        .log-content { max-height: 300px; overflow-y: auto; font-family: 'Courier New', monospace; font-size: 0.8em; }
        .log-line { padding: 2px 0; color: #ddd; white-space: pre-wrap; word-wrap: break-word; }
        .log-line:nth-child(even) { background: #222; }
        footer { margin-top: 30px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{TITLE}}</h1>
        <button class="refresh-btn" onclick="loadStats()">Refresh</button>
        <div id="last-update" class="timestamp"></div>
        <div id="fetch-error" class="error"></div>

        <div id="content">
            <p>Loading...</p>
        </div>
        <footer class="status">{{BANNER}}</footer>
    </div>

    <script>
        const PROJECTS = {{PROJECTS}};
        const REFRESH_MS = {{REFRESH_MS}};
        const RENDER_LINES = {{RENDER_LINES}};

        function escapeHtml(text) {
            const div = document.createElement('div');
            div.textContent = String(text);
            return div.innerHTML;
        }

        function labelize(key) {
            return key.split('_').map(w => w.charAt(0).toUpperCase() + w.slice(1)).join(' ');
        }

        function errorStat(note) {
            return '<div class="stat error">Error: ' + escapeHtml(note.error) + '</div>';
        }

        function renderGit(git) {
            if (!git) {
                return '';
            }
            if (git.error !== undefined) {
                return '<div class="stat error">Git error: ' + escapeHtml(git.error) + '</div>';
            }
            if (git.status !== undefined) {
                return '<div class="stat status">Git: ' + escapeHtml(git.status) + '</div>';
            }
            const changes = git.uncommitted_changes === null ? '?' : git.uncommitted_changes;
            return '<div class="stat">Git: ' + escapeHtml(git.branch) +
                ' (' + escapeHtml(changes) + ' changes)<br>' +
                '<span class="status">' + escapeHtml(git.last_commit) + '</span></div>';
        }

        function renderProject(project, data) {
            let html = '<div class="project">';
            html += '<h2>' + escapeHtml(project.label) + '</h2>';
            html += '<div class="stats">';
            if (!data) {
                html += '<div class="stat error">No data</div>';
            } else if (data.error !== undefined) {
                html += errorStat(data);
            } else {
                for (const [key, value] of Object.entries(data)) {
                    if (key === 'last_modified' || key === 'git_status') {
                        continue;
                    }
                    html += '<div class="stat">' + escapeHtml(labelize(key)) + ': ' + escapeHtml(value) + '</div>';
                }
                if (data.last_modified) {
                    html += '<div class="stat">Last Modified: ' + escapeHtml(data.last_modified.file) + '<br>' +
                        escapeHtml(new Date(data.last_modified.time).toLocaleString()) + '</div>';
                }
                html += renderGit(data.git_status);
            }
            html += '</div></div>';
            return html;
        }

        function renderSystem(system) {
            let html = '<div class="project">';
            html += '<h2>System Status</h2>';
            html += '<div class="stats">';
            if (system.error !== undefined) {
                html += errorStat(system);
            } else {
                html += '<div class="stat">Claude Processes: ' + escapeHtml(system.claude_processes) + '</div>';
                html += '<div class="stat">Load Average: ' +
                    escapeHtml(system.load_avg.map(x => x.toFixed(2)).join(', ')) + '</div>';
            }
            html += '</div></div>';
            return html;
        }

        function renderLogs(logs) {
            let html = '<div class="project">';
            html += '<h2>Live Terminal Output</h2>';
            const entries = Object.entries(logs || {});
            if (entries.length === 0) {
                html += '<div class="stat">No terminal logs available yet...</div>';
            }
            for (const [logFile, lines] of entries) {
                html += '<div class="terminal-log">';
                html += '<h3>' + escapeHtml(logFile) + '</h3>';
                html += '<div class="log-content">';
                lines.slice(-RENDER_LINES).forEach(line => {
                    html += '<div class="log-line">' + escapeHtml(line) + '</div>';
                });
                html += '</div></div>';
            }
            html += '</div>';
            return html;
        }

        function loadStats() {
            fetch('/api/stats')
                .then(response => {
                    if (!response.ok) {
                        throw new Error('HTTP ' + response.status);
                    }
                    return response.json();
                })
                .then(data => {
                    document.getElementById('last-update').textContent =
                        'Last updated: ' + new Date(data.timestamp).toLocaleString();
                    let html = '';
                    for (const project of PROJECTS) {
                        html += renderProject(project, data[project.name]);
                    }
                    html += renderSystem(data.system);
                    html += renderLogs(data.terminal_logs);
                    document.getElementById('content').innerHTML = html;
                    document.getElementById('fetch-error').textContent = '';
                })
                .catch(error => {
                    // Keep the last good content on screen until the next poll succeeds.
                    document.getElementById('fetch-error').textContent = 'Error loading data: ' + error;
                });
        }

        setInterval(loadStats, REFRESH_MS);
        loadStats();
    </script>
</body>
</html>
"#;
