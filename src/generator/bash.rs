//! Bash back end
//!
//! Emits one completion function implementing the runtime decision procedure
//! for a plan, followed by the `complete` statement that registers it.
//!
//! The emitted function runs once per completion trigger:
//!
//! 1. scans `COMP_WORDS[1..COMP_CWORD)` for flags, recording used flags and
//!    finding the options-finished boundary;
//! 2. drops the requiredness of slots whose `skip_if` flags were used;
//! 3. assigns every token after the boundary, up to the cursor, to the lowest
//!    still-required slot, or to the catch-all once none is left;
//! 4. picks a mode (`opt`, `opt_arg` or `arg`) and fills `COMPREPLY` from the
//!    matching completion source.
//!
//! Runtime state lives in indexed arrays keyed by plan ordinals, so keys never
//! depend on user strings and the script does not need bash 4 associative
//! arrays.

use crate::config::{Builtin, CompletionSource};
use crate::generator::escape::{quote, word_list};
use crate::generator::plan::{FlagPlan, Plan, SlotPlan};

/// Prefix of every generated function name
pub const FUNCTION_PREFIX: &str = "_compspec_";

/// Slot identifier used at runtime for the catch-all
const REST_SLOT: &str = "rest";

/// Name of the completion function for `command`
///
/// Characters that may not appear in a function name become `_`.
pub fn function_name(command: &str) -> String {
    let mut name = String::from(FUNCTION_PREFIX);
    name.extend(command.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '_'
        }
    }));
    name
}

/// Emit the completion function for `plan`
pub fn generate(plan: &Plan<'_>) -> String {
    let mut out = Emitter::default();
    let function = function_name(plan.command);

    out.line("# Generated by compspec. Do not edit.");
    out.open(format!("{}() {{", function));
    emit_prelude(&mut out);
    out.blank();
    emit_option_scan(&mut out, plan);
    out.blank();
    emit_slot_resolution(&mut out, plan);
    out.blank();
    emit_mode_selection(&mut out, plan);
    out.blank();
    emit_candidates(&mut out, plan);
    out.close("}");

    out.buf
}

/// Emit the statement binding the function to the command name
pub fn registration(plan: &Plan<'_>) -> String {
    format!("complete -F {} {}\n", function_name(plan.command), quote(plan.command))
}

fn emit_prelude(out: &mut Emitter) {
    out.line("local cur prev line");
    out.line("cur=\"${COMP_WORDS[COMP_CWORD]}\"");
    out.line("prev=\"\"");
    out.open("if (( COMP_CWORD > 0 )); then");
    out.line("prev=\"${COMP_WORDS[COMP_CWORD-1]}\"");
    out.close("fi");
    out.line("COMPREPLY=()");
}

fn emit_option_scan(out: &mut Emitter, plan: &Plan<'_>) {
    if !plan.has_flags() {
        out.line("local opts_finished=1 boundary=0");
        return;
    }

    out.line("local opts_finished=0 boundary=0 i=1 word");
    if plan.has_tracked_flags() {
        out.line("local -a flag_used=()");
    }
    out.open("while (( i < COMP_CWORD )); do");
    out.line("word=\"${COMP_WORDS[i]}\"");
    if plan.use_doubledash {
        out.open("if [[ $word == '--' ]]; then");
        out.line("opts_finished=1");
        out.line("boundary=$i");
        out.line("break");
        out.close("fi");
    }
    out.open(format!("if [[ $word != {}* ]]; then", quote(plan.prefix)));
    out.line("opts_finished=1");
    out.line("boundary=$(( i - 1 ))");
    out.line("break");
    out.close("fi");

    let active: Vec<&FlagPlan<'_>> = plan
        .flags
        .iter()
        .filter(|f| f.tracked || f.takes_value)
        .collect();
    if !active.is_empty() {
        out.open("case $word in");
        for flag in active {
            out.open(format!("{})", quote(flag.literal)));
            if flag.tracked {
                out.line(format!("flag_used[{}]=1", flag.id.0));
            }
            if flag.takes_value {
                out.line("i=$(( i + 1 ))");
            }
            out.close(";;");
        }
        out.close("esac");
    }
    out.line("boundary=$i");
    out.line("i=$(( i + 1 ))");
    out.close("done");
}

fn emit_slot_resolution(out: &mut Emitter, plan: &Plan<'_>) {
    if !plan.slots.is_empty() {
        let required = vec!["1"; plan.slots.len()].join(" ");
        out.line(format!("local -a slot_required=({})", required));
        for (ordinal, slot) in plan.slots.iter().enumerate() {
            if slot.skip_if.is_empty() {
                continue;
            }
            let used = slot
                .skip_if
                .iter()
                .map(|id| format!("[[ ${{flag_used[{}]-}} == 1 ]]", id.0))
                .collect::<Vec<_>>()
                .join(" || ");
            out.open(format!("if {}; then", used));
            out.line(format!("slot_required[{}]=0", ordinal));
            out.close("fi");
        }
    }

    out.line("local slot=\"\" j k");
    out.open("for (( j = boundary + 1; j <= COMP_CWORD; j++ )); do");
    out.line(format!("slot={}", REST_SLOT));
    if !plan.slots.is_empty() {
        out.open(format!("for (( k = 0; k < {}; k++ )); do", plan.slots.len()));
        out.open("if (( slot_required[k] )); then");
        out.line("slot_required[k]=0");
        out.line("slot=$k");
        out.line("break");
        out.close("fi");
        out.close("done");
    }
    out.close("done");
}

fn emit_mode_selection(out: &mut Emitter, plan: &Plan<'_>) {
    out.line("local mode=arg");
    if !plan.has_flags() {
        return;
    }

    let prefix_test = format!("[[ $cur == {}* ]]", quote(plan.prefix));
    let value_flags: Vec<&FlagPlan<'_>> = plan.value_flags().collect();
    if value_flags.is_empty() {
        out.open(format!("if (( ! opts_finished )) && {}; then", prefix_test));
        out.line("mode=opt");
        out.close("fi");
        return;
    }

    out.open("if (( ! opts_finished )); then");
    out.open("case $prev in");
    out.open(format!("{})", flag_patterns(&value_flags)));
    out.line("mode=opt_arg");
    out.close(";;");
    out.open("*)");
    out.open(format!("if {}; then", prefix_test));
    out.line("mode=opt");
    out.close("fi");
    out.close(";;");
    out.close("esac");
    out.close("fi");
}

fn emit_candidates(out: &mut Emitter, plan: &Plan<'_>) {
    out.open("case $mode in");

    if plan.has_flags() {
        out.open("opt)");
        let words = word_list(plan.flags.iter().map(|flag| flag.literal));
        emit_read_loop(out, &format!("compgen -W {} -- \"$cur\"", words), false);
        out.close(";;");

        let sourced: Vec<&FlagPlan<'_>> = plan
            .value_flags()
            .filter(|flag| flag.comp.is_some())
            .collect();
        if !sourced.is_empty() {
            out.open("opt_arg)");
            out.open("case $prev in");
            for flag in sourced {
                out.open(format!("{})", quote(flag.literal)));
                if let Some(comp) = flag.comp {
                    emit_source(out, comp);
                }
                out.close(";;");
            }
            out.close("esac");
            out.close(";;");
        }
    }

    let sourced: Vec<(usize, &SlotPlan<'_>)> = plan
        .slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.comp.is_some())
        .collect();
    if !sourced.is_empty() || plan.rest.is_some() {
        out.open("arg)");
        out.open("case $slot in");
        for (ordinal, slot) in sourced {
            out.open(format!("{})", ordinal));
            out.line(format!("# index {}", slot.index));
            if let Some(comp) = slot.comp {
                emit_source(out, comp);
            }
            out.close(";;");
        }
        if let Some(comp) = plan.rest {
            out.open(format!("{})", REST_SLOT));
            emit_source(out, comp);
            out.close(";;");
        }
        out.close("esac");
        out.close(";;");
    }

    out.close("esac");
}

fn emit_source(out: &mut Emitter, comp: &CompletionSource) {
    match comp {
        CompletionSource::Builtin(builtin) => {
            let action = match builtin {
                Builtin::Files => "-f",
                Builtin::Directories => "-d",
            };
            out.line("compopt -o filenames 2>/dev/null");
            emit_read_loop(out, &format!("compgen {} -- \"$cur\"", action), false);
        }
        CompletionSource::Command(argv) => {
            let argv = argv.iter().map(|arg| quote(arg)).collect::<Vec<_>>().join(" ");
            emit_read_loop(out, &format!("{} 2>/dev/null", argv), true);
        }
    }
}

/// Append every output line of `producer` to `COMPREPLY`
///
/// With `filter`, empty lines are dropped and the rest must start with `$cur`.
fn emit_read_loop(out: &mut Emitter, producer: &str, filter: bool) {
    out.open("while IFS= read -r line; do");
    if filter {
        out.open("if [[ -n $line && $line == \"$cur\"* ]]; then");
        out.line("COMPREPLY+=(\"$line\")");
        out.close("fi");
    } else {
        out.line("COMPREPLY+=(\"$line\")");
    }
    out.close(format!("done < <({})", producer));
}

fn flag_patterns(flags: &[&FlagPlan<'_>]) -> String {
    flags.iter().map(|flag| quote(flag.literal)).collect::<Vec<_>>().join("|")
}

#[derive(Default)]
struct Emitter {
    buf: String,
    depth: usize,
}

impl Emitter {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Emit `text` and indent what follows
    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent and emit `text`
    fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }
}
