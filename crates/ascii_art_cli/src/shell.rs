//! Interactive command loop around one loaded image.
use std::io::{self, BufRead, Write};

use ascii_art::{
    ArtAssembler, AsciiError, GlyphBrightnessTable, ResolutionBounds, ResolutionStep, SourceImage,
};

use crate::charspec::CharSpec;
use crate::config::ShellConfig;
use crate::output::{ArtOutput, OutputKind};

const PROMPT: &str = ">>> ";
const MIN_CHARSET_SIZE: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Did not add due to incorrect format.")]
    AddFormat,
    #[error("Did not remove due to incorrect format.")]
    RemoveFormat,
    #[error("Did not change resolution due to incorrect format.")]
    ResolutionFormat,
    #[error("Did not change resolution due to exceeding boundaries.")]
    ResolutionBoundaries,
    #[error("Did not change output method due to incorrect format.")]
    OutputFormat,
    #[error("Did not execute, charset is too small")]
    CharsetTooSmall,
    #[error("Did not execute due to incorrect command.")]
    IncorrectCommand,
    #[error(transparent)]
    Art(#[from] AsciiError),
    #[error("Did not write output: {0}")]
    Output(#[from] io::Error),
}

/// Whether the loop should keep reading commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    image: SourceImage,
    bounds: ResolutionBounds,
    table: GlyphBrightnessTable,
    assembler: ArtAssembler,
    resolution: u32,
    invert: bool,
    output: ArtOutput,
    config: ShellConfig,
}

impl Shell {
    pub fn new(image: SourceImage, config: ShellConfig) -> anyhow::Result<Self> {
        let table = GlyphBrightnessTable::with_chars(config.char_set()?);
        let bounds = ResolutionBounds::for_image(image.width(), image.height());
        tracing::debug!(
            "shell started for {}x{} image, resolution bounds {:?}",
            image.width(),
            image.height(),
            bounds
        );

        Ok(Self {
            image,
            bounds,
            table,
            assembler: ArtAssembler::new(),
            resolution: config.resolution,
            invert: config.invert,
            output: config.art_output(config.output),
            config,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn output(&self) -> &ArtOutput {
        &self.output
    }

    pub fn table(&self) -> &GlyphBrightnessTable {
        &self.table
    }

    /// Read commands from `input` until `exit` or end of input.
    ///
    /// Command failures are reported on `out` and do not stop the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            match self.execute(line.trim_end_matches(['\r', '\n']), out) {
                Ok(Flow::Continue) => {},
                Ok(Flow::Exit) => return Ok(()),
                Err(err) => writeln!(out, "{err}")?,
            }
        }
    }

    /// Execute one command line.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, ShellError> {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(Flow::Continue);
        };
        let param = tokens.next();
        tracing::debug!(command, ?param, "executing shell command");

        match command {
            "exit" => return Ok(Flow::Exit),
            "chars" => self.print_chars(out)?,
            "add" => {
                let spec = parse_spec(param).ok_or(ShellError::AddFormat)?;
                self.table.add_all(spec.into_chars());
            },
            "remove" => {
                let spec = parse_spec(param).ok_or(ShellError::RemoveFormat)?;
                self.table.remove_all(spec.into_chars());
            },
            "res" => self.change_resolution(param, out)?,
            "reverse" => self.invert = !self.invert,
            "output" => {
                let kind = match param {
                    Some("console") => OutputKind::Console,
                    Some("html") => OutputKind::Html,
                    _ => return Err(ShellError::OutputFormat),
                };
                self.output = self.config.art_output(kind);
            },
            "asciiArt" => self.render(out)?,
            _ => return Err(ShellError::IncorrectCommand),
        }

        Ok(Flow::Continue)
    }

    fn print_chars<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for symbol in self.table.chars() {
            writeln!(out, "{symbol} ")?;
        }
        writeln!(out)
    }

    fn change_resolution<W: Write>(
        &mut self,
        param: Option<&str>,
        out: &mut W,
    ) -> Result<(), ShellError> {
        let step = match param {
            None => None,
            Some("up") => Some(ResolutionStep::Up),
            Some("down") => Some(ResolutionStep::Down),
            Some(_) => return Err(ShellError::ResolutionFormat),
        };

        if let Some(step) = step {
            self.resolution = step
                .apply_within(self.resolution, self.bounds)
                .map_err(|_| ShellError::ResolutionBoundaries)?;
        }

        writeln!(out, "Resolution set to {}.", self.resolution)?;
        Ok(())
    }

    fn render<W: Write>(&mut self, out: &mut W) -> Result<(), ShellError> {
        if self.table.len() < MIN_CHARSET_SIZE {
            return Err(ShellError::CharsetTooSmall);
        }

        let grid =
            self.assembler.run(&self.image, self.resolution, self.table.index(), self.invert)?;
        self.output.write(&grid, out)?;
        Ok(())
    }
}

fn parse_spec(param: Option<&str>) -> Option<CharSpec> {
    param?.parse().ok()
}

#[cfg(test)]
mod tests {
    use ascii_art::solid;
    use image::{Rgb, RgbImage};

    use super::*;

    fn shell_for(image: RgbImage) -> Shell {
        Shell::new(SourceImage::new(image), ShellConfig::default()).unwrap()
    }

    fn transcript(shell: &mut Shell, commands: &str) -> String {
        let mut out = Vec::new();
        shell.run(commands.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn defaults_match_the_classic_shell() {
        let mut shell = shell_for(solid(8, 8, [0, 0, 0]));

        assert_eq!(
            transcript(&mut shell, "chars\nres\n"),
            ">>> 0 \n1 \n2 \n3 \n4 \n5 \n6 \n7 \n8 \n9 \n\n>>> Resolution set to 2.\n>>> "
        );
        assert!(!shell.invert());
        assert_eq!(shell.output(), &ArtOutput::Console);
    }

    #[test]
    fn exit_stops_reading() {
        let mut shell = shell_for(solid(8, 8, [0, 0, 0]));
        let out = transcript(&mut shell, "exit\nchars\n");
        assert_eq!(out, ">>> ");
    }

    #[test]
    fn add_and_remove_accept_ranges_and_keywords() {
        let mut shell = shell_for(solid(8, 8, [0, 0, 0]));
        let mut sink = Vec::new();

        shell.execute("remove all", &mut sink).unwrap();
        assert!(shell.table().is_empty());
        shell.execute("add z-x", &mut sink).unwrap();
        shell.execute("add space", &mut sink).unwrap();
        shell.execute("add x", &mut sink).unwrap();
        assert_eq!(shell.table().chars().collect::<String>(), " xyz");

        shell.execute("remove y", &mut sink).unwrap();
        assert_eq!(shell.table().chars().collect::<String>(), " xz");

        let mut listed = Vec::new();
        shell.execute("chars", &mut listed).unwrap();
        assert_eq!(String::from_utf8(listed).unwrap(), "  \nx \nz \n\n");
    }

    #[test]
    fn malformed_commands_report_errors() {
        let mut shell = shell_for(solid(8, 8, [0, 0, 0]));
        let out = transcript(
            &mut shell,
            "add\nadd ab\nremove a-\nres sideways\noutput pdf\nfrobnicate\n\n",
        );

        let expected = [
            "Did not add due to incorrect format.",
            "Did not add due to incorrect format.",
            "Did not remove due to incorrect format.",
            "Did not change resolution due to incorrect format.",
            "Did not change output method due to incorrect format.",
            "Did not execute due to incorrect command.",
        ];
        let lines: Vec<_> = out.split(PROMPT).filter(|line| !line.is_empty()).collect();
        assert_eq!(lines, expected.iter().map(|line| format!("{line}\n")).collect::<Vec<_>>());
    }

    #[test]
    fn resolution_respects_image_bounds() {
        // 4x2 image: resolution may range from 2 to 4.
        let mut shell = shell_for(solid(4, 2, [0, 0, 0]));
        let mut out = Vec::new();

        shell.execute("res up", &mut out).unwrap();
        assert_eq!(shell.resolution(), 4);
        assert!(matches!(shell.execute("res up", &mut out), Err(ShellError::ResolutionBoundaries)));
        shell.execute("res down", &mut out).unwrap();
        assert!(matches!(
            shell.execute("res down", &mut out),
            Err(ShellError::ResolutionBoundaries)
        ));
        assert_eq!(shell.resolution(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "Resolution set to 4.\nResolution set to 2.\n");
    }

    #[test]
    fn rendering_requires_two_characters() {
        let mut shell = shell_for(solid(8, 8, [0, 0, 0]));
        let mut sink = Vec::new();

        shell.execute("remove 1-9", &mut sink).unwrap();
        assert!(matches!(shell.execute("asciiArt", &mut sink), Err(ShellError::CharsetTooSmall)));
        assert_eq!(ShellError::CharsetTooSmall.to_string(), "Did not execute, charset is too small");
    }

    #[test]
    fn ascii_art_prints_the_grid_and_honors_reverse() {
        let image = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let mut shell = shell_for(image);
        let mut out = Vec::new();

        shell.execute("remove all", &mut out).unwrap();
        shell.execute("add space", &mut out).unwrap();
        shell.execute("add #", &mut out).unwrap();
        shell.execute("asciiArt", &mut out).unwrap();
        shell.execute("reverse", &mut out).unwrap();
        shell.execute("asciiArt", &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), " #\n #\n# \n# \n");
    }

    #[test]
    fn output_switches_between_console_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig { html_file: dir.path().join("art.html"), ..ShellConfig::default() };
        let mut shell = Shell::new(SourceImage::new(solid(8, 8, [0, 0, 0])), config).unwrap();
        let mut out = Vec::new();

        shell.execute("output html", &mut out).unwrap();
        shell.execute("asciiArt", &mut out).unwrap();
        assert!(out.is_empty());
        assert!(dir.path().join("art.html").exists());

        shell.execute("output console", &mut out).unwrap();
        assert_eq!(shell.output(), &ArtOutput::Console);
    }

    #[test]
    fn core_errors_are_printed_and_the_loop_continues() {
        // 12x4 pads to 16x4; the default resolution of 2 gives 8px tiles that
        // do not fit the padded height.
        let mut shell = shell_for(solid(12, 4, [0, 0, 0]));
        let out = transcript(&mut shell, "asciiArt\nres\n");

        assert!(out.contains("resolution 2 does not tile the padded 16x4 image"));
        assert!(out.ends_with("Resolution set to 2.\n>>> "));
    }
}
