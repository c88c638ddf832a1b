use std::fs;
use std::path::{Path, PathBuf};

use cf_core::{CaseFileError, Choice, ChoiceBehavior, Consequence, Episode};
use tracing::debug;
use walkdir::WalkDir;

use crate::{map_case_invalid, map_cli_case_path, map_cli_case_read, map_cli_case_scan};

const CASE_FILE_SUFFIX: &str = ".case.json";

pub(crate) fn load_episodes(case_dir: &str) -> Result<Vec<Episode>, CaseFileError> {
    let root = resolve_case_dir(case_dir)?;
    read_episodes_from_dir(&root)
}

/// Picks the episode by id, or the lowest-numbered one.
pub(crate) fn select_episode(
    mut episodes: Vec<Episode>,
    episode_id: Option<&str>,
) -> Result<Episode, CaseFileError> {
    match episode_id {
        Some(id) => {
            let index = episodes
                .iter()
                .position(|episode| episode.id == id)
                .ok_or_else(|| {
                    CaseFileError::new(
                        "CLI_EPISODE_NOT_FOUND",
                        format!("Episode \"{}\" is not in the case directory.", id),
                    )
                })?;
            Ok(episodes.swap_remove(index))
        }
        None => {
            if episodes.is_empty() {
                return Err(CaseFileError::new("CLI_CASE_EMPTY", "No episodes loaded."));
            }
            Ok(episodes.remove(0))
        }
    }
}

pub(crate) fn resolve_case_dir(case_dir: &str) -> Result<PathBuf, CaseFileError> {
    let path = PathBuf::from(case_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_case_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(CaseFileError::new(
            "CLI_CASE_NOT_FOUND",
            format!("case-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(CaseFileError::new(
            "CLI_CASE_NOT_DIR",
            format!("case-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn read_episodes_from_dir(case_dir: &Path) -> Result<Vec<Episode>, CaseFileError> {
    let mut episodes = Vec::new();

    for entry in WalkDir::new(case_dir).follow_links(false) {
        let entry = entry.map_err(map_cli_case_scan)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path.to_string_lossy().ends_with(CASE_FILE_SUFFIX) {
            continue;
        }

        let content = fs::read_to_string(path).map_err(map_cli_case_read)?;
        let episode: Episode = serde_json::from_str(&content).map_err(map_case_invalid)?;
        validate_episode(&episode)?;
        debug!(path = %path.display(), episode = %episode.id, "loaded episode");
        episodes.push(episode);
    }

    if episodes.is_empty() {
        return Err(CaseFileError::new(
            "CLI_CASE_EMPTY",
            format!("No {} files under {}", CASE_FILE_SUFFIX, case_dir.display()),
        ));
    }

    episodes.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
    Ok(episodes)
}

fn validate_episode(episode: &Episode) -> Result<(), CaseFileError> {
    if episode.scene(&episode.entry_scene).is_none() {
        return Err(case_invalid(format!(
            "Episode \"{}\" has no entry scene \"{}\".",
            episode.id, episode.entry_scene
        )));
    }
    let known_choice = |choice_id: &str| {
        episode
            .scenes
            .iter()
            .any(|scene| scene.choice(choice_id).is_some())
    };
    for scene in &episode.scenes {
        let targets = scene
            .next_scene
            .iter()
            .chain(scene.choices().iter().filter_map(|choice| choice.next_scene.as_ref()));
        for target in targets {
            if episode.scene(target).is_none() {
                return Err(case_invalid(format!(
                    "Scene \"{}\" points to missing scene \"{}\".",
                    scene.id, target
                )));
            }
        }
        for evidence_id in &scene.requirements.evidence {
            check_evidence(episode, &scene.id, evidence_id)?;
        }
        for choice_id in &scene.requirements.choices {
            if !known_choice(choice_id) {
                return Err(case_invalid(format!(
                    "Scene \"{}\" requires unknown choice \"{}\".",
                    scene.id, choice_id
                )));
            }
        }
        for choice in scene.choices() {
            validate_choice(episode, choice)?;
        }
    }
    Ok(())
}

fn validate_choice(episode: &Episode, choice: &Choice) -> Result<(), CaseFileError> {
    if let ChoiceBehavior::Required { evidence } = &choice.behavior {
        for evidence_id in evidence {
            check_evidence(episode, &choice.id, evidence_id)?;
        }
    }
    for consequence in &choice.consequences {
        match consequence {
            Consequence::EvidenceUnlock { evidence_id } => {
                check_evidence(episode, &choice.id, evidence_id)?;
            }
            Consequence::SceneUnlock { scene_id } if episode.scene(scene_id).is_none() => {
                return Err(case_invalid(format!(
                    "Choice \"{}\" unlocks missing scene \"{}\".",
                    choice.id, scene_id
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_evidence(episode: &Episode, owner: &str, evidence_id: &str) -> Result<(), CaseFileError> {
    if episode.evidence(evidence_id).is_none() {
        return Err(case_invalid(format!(
            "\"{}\" refers to unknown evidence \"{}\".",
            owner, evidence_id
        )));
    }
    Ok(())
}

fn case_invalid(message: String) -> CaseFileError {
    CaseFileError::new("STORY_CASE_INVALID", message)
}
