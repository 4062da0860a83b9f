use crate::generator::Language;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "blockgen",
    about = "Generate JavaScript, Dart or Python source from a Blockly-style XML workspace."
)]
pub struct Args {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        default_value = "javascript",
        help = "Target language: javascript (js), dart or python (py)."
    )]
    pub language: Language,

    #[arg(
        long,
        help = "Write a zip bundle with every target and a digest manifest to OUTPUT."
    )]
    pub bundle: bool,
}
