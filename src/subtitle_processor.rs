use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use log::{info, warn, debug};
use crate::errors::ParseError;

// @module: ASS script parsing and ASS/SRT serialization

/// Section marker opening the script metadata block
const SECTION_SCRIPT_INFO: &str = "[Script Info]";

/// Section marker opening the style table
const SECTION_STYLES: &str = "[V4+ Styles]";

/// Section marker opening the event table
const SECTION_EVENTS: &str = "[Events]";

/// Prefix of a dialogue record inside the [Events] section
const DIALOGUE_PREFIX: &str = "Dialogue:";

/// Number of comma-separated fields in a valid dialogue record
const DIALOGUE_FIELD_COUNT: usize = 10;

/// Column declaration written into every exported style table. The source
/// file's own declaration is not trusted; exports always carry this one.
const STYLE_FORMAT_LINE: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Column declaration written into every exported event table
const EVENT_FORMAT_LINE: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Guard subtitle written as entry 1 of every non-empty SRT export, so that
/// tools which drop the first entry (REAPER) never eat a real line
const SRT_GUARD_TEXT: &str = "(Защита от удаления первого саба REAPER'ом!)";

// @struct: Single dialogue record from the [Events] section
#[derive(Debug, Clone)]
pub struct DialogueEvent {
    // @field: Layer (prefix stripped, trimmed)
    pub layer: String,

    // @field: Start time in ASS notation (H:MM:SS.cc)
    pub start: String,

    // @field: End time in ASS notation
    pub end: String,

    // @field: Style name
    pub style: String,

    // @field: Actor field, raw as written
    pub actor: String,

    // @field: Left margin
    pub margin_l: String,

    // @field: Right margin
    pub margin_r: String,

    // @field: Vertical margin
    pub margin_v: String,

    // @field: Effect
    pub effect: String,

    // @field: Free text, may itself contain commas
    pub text: String,

    // @field: Verbatim source line, reproduced in ASS exports
    pub raw: String,
}

impl DialogueEvent {
    /// Parse one `Dialogue:` line into an event. Only the first nine commas
    /// are treated as field separators so the text field keeps its commas.
    /// Returns None when the line has fewer than ten fields.
    pub fn from_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.splitn(DIALOGUE_FIELD_COUNT, ',').collect();
        if parts.len() < DIALOGUE_FIELD_COUNT {
            return None;
        }

        let layer = parts[0]
            .strip_prefix(DIALOGUE_PREFIX)
            .unwrap_or(parts[0])
            .trim()
            .to_string();

        Some(DialogueEvent {
            layer,
            start: parts[1].to_string(),
            end: parts[2].to_string(),
            style: parts[3].to_string(),
            actor: parts[4].to_string(),
            margin_l: parts[5].to_string(),
            margin_r: parts[6].to_string(),
            margin_v: parts[7].to_string(),
            effect: parts[8].to_string(),
            text: parts[9].to_string(),
            raw: line.to_string(),
        })
    }

    /// Convert the start time to SRT notation
    pub fn format_start_time(&self) -> String {
        format_srt_time(&self.start)
    }

    /// Convert the end time to SRT notation
    pub fn format_end_time(&self) -> String {
        format_srt_time(&self.end)
    }

    /// Render this event as one numbered SRT block
    pub fn to_srt_block(&self, index: usize) -> String {
        format!(
            "{}\n{} --> {}\n{}\n\n",
            index,
            self.format_start_time(),
            self.format_end_time(),
            clean_srt_text(&self.text)
        )
    }
}

/// Convert an ASS timestamp (H:MM:SS.cc) to SRT notation (HH:MM:SS,fff).
///
/// The hour is zero-padded to two digits and the fractional part is padded
/// or truncated to exactly three digits. A timestamp that does not have
/// three colon-separated components, or whose seconds carry no decimal
/// point, is returned as-is with dots replaced by commas. This is a lossy
/// passthrough, never an error.
pub fn format_srt_time(ass_time: &str) -> String {
    let parts: Vec<&str> = ass_time.split(':').collect();
    if parts.len() != 3 {
        return ass_time.replace('.', ",");
    }
    let Some((seconds, centiseconds)) = parts[2].split_once('.') else {
        return ass_time.replace('.', ",");
    };
    let milliseconds: String = format!("{:0<3}", centiseconds).chars().take(3).collect();
    format!("{:0>2}:{}:{},{}", parts[0], parts[1], seconds, milliseconds)
}

/// Strip ASS markup down to plain SRT text: line-break markers become a
/// single space, the italic-open marker is dropped, and every remaining
/// brace character is deleted. Characters between braces are kept verbatim.
fn clean_srt_text(text: &str) -> String {
    let text = text.replace("\\N", " ").replace("{i}", "");
    text.chars().filter(|c| !matches!(c, '{' | '}')).collect()
}

/// Collection of preserved header lines, preserved style lines and parsed
/// dialogue events from one ASS script
#[derive(Debug, Default)]
pub struct ScriptFile {
    /// Preserved [Script Info] lines, original order
    pub headers: Vec<String>,

    /// Preserved [V4+ Styles] lines, original order
    pub styles: Vec<String>,

    /// Parsed dialogue events, file order
    pub events: Vec<DialogueEvent>,
}

impl ScriptFile {
    /// Parse a script file from disk
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        info!("Parsing script file: {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parse script content already in memory.
    ///
    /// Keeps a section cursor that moves on every line starting with `[`.
    /// Header and style lines are preserved verbatim (trimmed); inside
    /// [Events] only `Dialogue:` lines are kept, everything else including
    /// the Format declaration is discarded. Malformed dialogue lines are
    /// skipped with a warning. Fails only when the whole file yields zero
    /// valid dialogue lines.
    pub fn parse_str(content: &str) -> Result<Self, ParseError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut script = ScriptFile::default();
        let mut current_section: Option<Section> = None;
        let mut skipped = 0usize;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                current_section = Section::from_marker(line);
                continue;
            }
            match current_section {
                Some(Section::ScriptInfo) => script.headers.push(line.to_string()),
                Some(Section::Styles) => script.styles.push(line.to_string()),
                Some(Section::Events) => {
                    if line.starts_with(DIALOGUE_PREFIX) {
                        match DialogueEvent::from_line(line) {
                            Some(event) => script.events.push(event),
                            None => {
                                warn!("Skipping malformed dialogue line: {}", line);
                                skipped += 1;
                            }
                        }
                    }
                }
                None => {}
            }
        }

        if script.events.is_empty() {
            warn!("No Dialogue lines found in the [Events] section");
            return Err(ParseError::NoDialogueLines);
        }

        if skipped > 0 {
            warn!("Skipped {} malformed dialogue lines", skipped);
        }
        debug!(
            "Parsed {} headers, {} styles, {} events",
            script.headers.len(),
            script.styles.len(),
            script.events.len()
        );
        Ok(script)
    }
}

/// Sections of an ASS script the parser collects from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    ScriptInfo,
    Styles,
    Events,
}

impl Section {
    /// Map a bracketed marker line to a known section. Unknown sections
    /// park the cursor so their lines are collected nowhere.
    fn from_marker(line: &str) -> Option<Self> {
        match line {
            SECTION_SCRIPT_INFO => Some(Section::ScriptInfo),
            SECTION_STYLES => Some(Section::Styles),
            SECTION_EVENTS => Some(Section::Events),
            _ => None,
        }
    }
}

/// Render a bucket of events as a full ASS script. Headers and styles are
/// copied verbatim; both Format declarations are the fixed literals, not
/// whatever the source declared.
pub fn render_ass(headers: &[String], styles: &[String], events: &[&DialogueEvent]) -> String {
    let mut out = String::new();
    out.push_str(SECTION_SCRIPT_INFO);
    out.push('\n');
    for header in headers {
        out.push_str(header);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(SECTION_STYLES);
    out.push('\n');
    out.push_str(STYLE_FORMAT_LINE);
    out.push('\n');
    for style in styles {
        out.push_str(style);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(SECTION_EVENTS);
    out.push('\n');
    out.push_str(EVENT_FORMAT_LINE);
    out.push('\n');
    for event in events {
        out.push_str(&event.raw);
        out.push('\n');
    }
    out
}

/// Render a bucket of events as an SRT file. A non-empty bucket gets the
/// guard entry at index 1, spanning from zero to the first real start time;
/// real entries follow from index 2. An empty bucket renders to nothing.
pub fn render_srt(events: &[&DialogueEvent]) -> String {
    let mut out = String::new();
    if events.is_empty() {
        return out;
    }
    out.push_str(&format!(
        "1\n00:00:00,000 --> {}\n{}\n\n",
        events[0].format_start_time(),
        SRT_GUARD_TEXT
    ));
    for (i, event) in events.iter().enumerate() {
        out.push_str(&event.to_srt_block(i + 2));
    }
    out
}

/// Write a bucket to disk as an ASS script
pub fn write_ass_file<P: AsRef<Path>>(
    path: P,
    headers: &[String],
    styles: &[String],
    events: &[&DialogueEvent],
) -> std::io::Result<()> {
    let mut file = File::create(path.as_ref())?;
    file.write_all(render_ass(headers, styles, events).as_bytes())
}

/// Write a bucket to disk as an SRT file
pub fn write_srt_file<P: AsRef<Path>>(path: P, events: &[&DialogueEvent]) -> std::io::Result<()> {
    let mut file = File::create(path.as_ref())?;
    file.write_all(render_srt(events).as_bytes())
}
