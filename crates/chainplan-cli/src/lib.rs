//! chainplan-cli — bibliothèque interne du binaire `chainplan`
//!
//! Le parsing d'arguments reste dans `main.rs` ; ici :
//! - `Command` / tâches : description haut-niveau de ce qu'il faut faire
//! - `execute` : lecture du script, liaison des contrats, planification, rendu
//! - rendu JSON (`{"commands": [...], "state": [...]}`) ou désassemblage texte
//! - traces (`feature = "trace"`) et couleurs (`feature = "color"`) optionnelles

#![deny(unused_must_use)]
#![forbid(unsafe_code)]

use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{anyhow, Context, Result};
use chainplan_abi::{to_hex, Function};
use chainplan_planner::{disassemble, Program};

#[cfg(feature = "color")]
use owo_colors::OwoColorize;

pub mod script;

pub use script::Script;

// ───────────────────────────── Types publics ─────────────────────────────

/// Commande haut-niveau (sans parsing CLI — réservé à main.rs).
#[derive(Clone, Debug)]
pub enum Command {
    /// Planifier un script.
    Plan(PlanTask),
    /// Afficher les sélecteurs de signatures.
    Selector(SelectorTask),
}

/// Planification d'un script.
#[derive(Clone, Debug, Default)]
pub struct PlanTask {
    /// Script JSON.
    pub input: Input,
    /// Destination du programme.
    pub output: Output,
    /// Rendu.
    pub format: OutputFormat,
    /// Afficher le temps de planification.
    pub time: bool,
}

/// Calcul de sélecteurs.
#[derive(Clone, Debug, Default)]
pub struct SelectorTask {
    /// Signatures lisibles (`add(uint256,uint256)`, `function f(uint a) returns (bool)`).
    pub signatures: Vec<String>,
}

/// Rendu du programme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{"commands": [...], "state": [...]}`
    #[default]
    Json,
    /// Désassemblage texte.
    Disasm,
}

/// Entrée texte : fichier ou `-` (=stdin).
#[derive(Clone, Debug, Default)]
pub enum Input {
    /// Entrée standard (les chemins d'ABI sont alors relatifs au dossier courant).
    #[default]
    Stdin,
    /// Fichier.
    Path(PathBuf),
}

/// Sortie texte.
#[derive(Clone, Debug, Default)]
pub enum Output {
    /// Sortie standard.
    #[default]
    Stdout,
    /// Fichier (écriture atomique).
    Path(PathBuf),
}

// ───────────────────────────── Initialisation ─────────────────────────────

/// Initialise le logger selon la feature `trace`.
pub fn init_logger() {
    #[cfg(feature = "trace")]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .try_init();
    }
}

// ───────────────────────────── Exécution ─────────────────────────────

/// Exécute une commande. Retourne un code de sortie.
pub fn execute(cmd: Command) -> Result<i32> {
    match cmd {
        Command::Plan(t) => plan_entry(&t),
        Command::Selector(t) => {
            print!("{}", selectors(&t.signatures)?);
            Ok(0)
        }
    }
}

fn plan_entry(task: &PlanTask) -> Result<i32> {
    let text = read_source(&task.input).context("lecture du script")?;
    let base_dir = match &task.input {
        Input::Path(p) => p.parent().map(Path::to_path_buf).unwrap_or_default(),
        Input::Stdin => PathBuf::from("."),
    };

    let start = Instant::now();
    let program = plan_script(&text, &base_dir)?;
    let elapsed = start.elapsed();

    #[cfg(feature = "trace")]
    log::info!(
        "planned {} commands into {} slots",
        program.instructions.len(),
        program.state.len()
    );

    let rendered = render(&program, task.format)?;
    match &task.output {
        Output::Stdout => {
            let mut w = BufWriter::new(io::stdout().lock());
            w.write_all(rendered.as_bytes())?;
            w.flush()?;
        }
        Output::Path(p) => {
            write_text_atomic(p, &rendered).with_context(|| format!("écriture de {}", display(p)))?;
            status_ok("WRITE", &display(p));
        }
    }

    status_ok(
        "PLAN",
        &format!("{} instructions, {} slots", program.instructions.len(), program.state.len()),
    );
    if task.time {
        status_info("TIME", &format!("plan: {} µs", elapsed.as_micros()));
    }
    Ok(0)
}

/// Parse, lie, planifie et valide un script.
pub fn plan_script(text: &str, base_dir: &Path) -> Result<Program> {
    let script = Script::from_json(text)?;
    let planner = script.build(base_dir)?;
    let program = planner.plan().context("échec de planification")?;
    program.validate()?;
    Ok(program)
}

/// Rend un programme au format demandé (terminé par un saut de ligne).
pub fn render(program: &Program, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "commands": program.commands_hex(),
                "state": program.state_hex(),
            });
            let mut text = serde_json::to_string_pretty(&payload)?;
            text.push('\n');
            text
        }
        OutputFormat::Disasm => disassemble(program),
    })
}

/// Une ligne `0x<sélecteur>  <signature canonique>` par signature.
pub fn selectors(signatures: &[String]) -> Result<String> {
    if signatures.is_empty() {
        return Err(anyhow!("aucune signature fournie"));
    }
    let mut out = String::new();
    for sig in signatures {
        let function = Function::parse(sig).with_context(|| format!("signature `{sig}`"))?;
        out.push_str(&format!("{}  {}\n", to_hex(&function.selector()), function.signature()));
    }
    Ok(out)
}

// ───────────────────────────── Utilitaires E/S ─────────────────────────────

fn read_source(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            Ok(s)
        }
        Input::Path(p) => {
            fs::read_to_string(p).with_context(|| format!("ouverture: {}", display(p)))
        }
    }
}

fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("chemin de sortie sans nom de fichier: {}", display(path)))?;
    let tmp = unique_tmp_path(&parent, name);
    {
        let mut w = BufWriter::new(File::create(&tmp)?);
        w.write_all(text.as_bytes())?;
        w.flush()?;
    }
    fs::rename(&tmp, path).or_else(|_| {
        // fallback : copie puis suppr tmp
        fs::copy(&tmp, path).and_then(|_| fs::remove_file(&tmp))
    })?;
    Ok(())
}

fn unique_tmp_path(dir: &Path, base: &std::ffi::OsStr) -> PathBuf {
    let mut i = 0u32;
    loop {
        let candidate = dir.join(format!("{}.tmp{}", base.to_string_lossy(), i));
        if !candidate.exists() {
            return candidate;
        }
        i = i.wrapping_add(1);
    }
}

fn display(p: &Path) -> String { p.to_string_lossy().to_string() }

// ───────────────────────────── Sorties jolies ─────────────────────────────

fn status_ok(tag: &str, msg: &str) {
    #[cfg(feature = "color")]
    {
        eprintln!("{} {}", tag.green().bold(), msg);
    }
    #[cfg(not(feature = "color"))]
    {
        eprintln!("{tag} {msg}");
    }
}

fn status_info(tag: &str, msg: &str) {
    #[cfg(feature = "color")]
    {
        eprintln!("{} {}", tag.blue().bold(), msg);
    }
    #[cfg(not(feature = "color"))]
    {
        eprintln!("{tag} {msg}");
    }
}

// ───────────────────────────── Tests ─────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MATH_ABI: &str = r#"[{"type":"function","name":"add",
        "inputs":[{"name":"a","type":"uint256"},{"name":"b","type":"uint256"}],
        "outputs":[{"name":"","type":"uint256"}]}]"#;

    const SCRIPT: &str = r#"{
        "contracts": {
            "math": { "address": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee", "abi": "abis/Math.json" }
        },
        "commands": [ { "call": "math.add", "args": [1, 2] } ]
    }"#;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("abis")).unwrap();
        fs::write(dir.path().join("abis/Math.json"), MATH_ABI).unwrap();
        fs::write(dir.path().join("plan.json"), SCRIPT).unwrap();
        dir
    }

    #[test]
    fn abi_paths_are_relative_to_the_script() {
        let dir = workspace();
        let task = PlanTask {
            input: Input::Path(dir.path().join("plan.json")),
            output: Output::Path(dir.path().join("out.json")),
            format: OutputFormat::Json,
            time: false,
        };
        assert_eq!(execute(Command::Plan(task)).unwrap(), 0);

        let out: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
        assert_eq!(
            out["commands"][0],
            format!("0x771602f70001ffffffffffff{}", "ee".repeat(20))
        );
        assert_eq!(out["state"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn disasm_rendering() {
        let dir = workspace();
        let program = plan_script(SCRIPT, dir.path()).unwrap();
        let text = render(&program, OutputFormat::Disasm).unwrap();
        assert!(text.contains("771602f7"), "{text}");
        assert!(text.contains("s0, s1 -> _"), "{text}");
    }

    #[test]
    fn missing_abi_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = plan_script(SCRIPT, dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Math.json"));
    }

    #[test]
    fn selector_lines() {
        let out = selectors(&["add(uint,uint)".to_string(), "balanceOf(address)".to_string()])
            .unwrap();
        assert_eq!(
            out,
            "0x771602f7  add(uint256,uint256)\n0x70a08231  balanceOf(address)\n"
        );
        assert!(selectors(&[]).is_err());
        assert!(selectors(&["nope".to_string()]).is_err());
    }
}
