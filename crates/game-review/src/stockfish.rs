//! Stockfish engine wrapper using UCI protocol (async I/O)

use shakmaty::Chess;
use shakmaty::fen::Fen;
use shakmaty::EnPassantMode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use tracing::debug;

use crate::error::ReviewError;
use crate::oracle::{EvaluationOracle, EvaluationResult, RawScore};

/// Stockfish engine instance, one per review session
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    mate_score: i32,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: &str, mate_score: i32) -> Result<Self, ReviewError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| {
                ReviewError::OracleUnavailable(format!("Failed to spawn Stockfish at {path}: {e}"))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| ReviewError::OracleUnavailable("Stockfish stdin not piped".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| ReviewError::OracleUnavailable("Stockfish stdout not piped".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            mate_score,
        };

        // Initialize UCI
        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        // Configure for analysis
        engine.send("setoption name Threads value 1").await?;
        engine.send("setoption name Hash value 256").await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("ucinewgame").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), ReviewError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| {
                ReviewError::OracleUnavailable(format!("Failed to write to Stockfish: {e}"))
            })?;
        self.stdin
            .flush()
            .await
            .map_err(|e| ReviewError::OracleUnavailable(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read one trimmed line. EOF means the process died.
    async fn read_line(&mut self, line: &mut String) -> Result<(), ReviewError> {
        line.clear();
        let n = self.stdout.read_line(line).await.map_err(|e| {
            ReviewError::OracleUnavailable(format!("Failed to read from Stockfish: {e}"))
        })?;
        if n == 0 {
            return Err(ReviewError::OracleUnavailable(
                "Stockfish closed its output".into(),
            ));
        }
        debug!(line = line.trim(), "SF >");
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), ReviewError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            if line.trim() == expected {
                return Ok(());
            }
        }
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl EvaluationOracle for StockfishEngine {
    /// Search `pos` to `depth` and keep the last reported score and PV.
    async fn evaluate(&mut self, pos: &Chess, depth: u32) -> Result<EvaluationResult, ReviewError> {
        let fen = Fen::from_position(pos, EnPassantMode::Legal).to_string();
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let mut score: Option<RawScore> = None;
        let mut pv: Vec<String> = Vec::new();

        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" score ") {
                // Bound-only lines are superseded by the next exact one
                if trimmed.contains("lowerbound") || trimmed.contains("upperbound") {
                    continue;
                }
                if let Some(raw) = parse_score(trimmed) {
                    score = Some(raw);
                }
                let line_pv = parse_pv(trimmed);
                if !line_pv.is_empty() {
                    pv = line_pv;
                }
            } else if trimmed.starts_with("bestmove") {
                // Some builds print a bestmove without any pv line at low depth
                if pv.is_empty() {
                    if let Some(best) = trimmed.split_whitespace().nth(1) {
                        if best != "(none)" {
                            pv.push(best.to_string());
                        }
                    }
                }
                break;
            }
        }

        Ok(EvaluationResult::from_raw(pos, score, pv, self.mate_score))
    }

    async fn shutdown(&mut self) {
        self.quit().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Parse the score token pair from an info line
fn parse_score(line: &str) -> Option<RawScore> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "score" && i + 2 < parts.len() {
            let value = parts[i + 2].parse().ok()?;
            return match parts[i + 1] {
                "cp" => Some(RawScore::Cp(value)),
                "mate" => Some(RawScore::Mate(value)),
                _ => None,
            };
        }
    }
    None
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut in_pv = false;
    let mut moves = Vec::new();

    for part in parts {
        if part == "pv" {
            in_pv = true;
            continue;
        }
        if in_pv {
            // PV ends at next keyword or end of line
            if part.starts_with("bmc") || part == "string" {
                break;
            }
            moves.push(part.to_string());
        }
    }

    moves
}
