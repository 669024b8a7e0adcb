//! Story workspace: plot / characters / genre form and experiment playback.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::api::{ApiError, Experiment, OptionsResponse, PlaygroundApi, StoryRequest, StoryResponse};
use crate::prompt::{parse_max_tokens, parse_temperature, FormError};

/// Minimum plot length accepted by the backend.
pub const MIN_PLOT_CHARS: usize = 5;

/// Narrative arcs the backend knows labels for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrativeArc {
    HerosJourney,
    ComingOfAge,
    Quest,
    Revenge,
    ComedyOfErrors,
    Tragedy,
}

impl NarrativeArc {
    pub const ALL: [NarrativeArc; 6] = [
        Self::HerosJourney,
        Self::ComingOfAge,
        Self::Quest,
        Self::Revenge,
        Self::ComedyOfErrors,
        Self::Tragedy,
    ];

    /// Identifier sent in the `arco` field.
    pub fn id(&self) -> &'static str {
        match self {
            Self::HerosJourney => "viaje_del_heroe",
            Self::ComingOfAge => "maduracion",
            Self::Quest => "busqueda",
            Self::Revenge => "venganza",
            Self::ComedyOfErrors => "comedia_de_enredos",
            Self::Tragedy => "tragedia",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HerosJourney => "Viaje del héroe",
            Self::ComingOfAge => "Historia de maduración",
            Self::Quest => "Búsqueda",
            Self::Revenge => "Venganza",
            Self::ComedyOfErrors => "Comedia de enredos",
            Self::Tragedy => "Tragedia",
        }
    }
}

impl FromStr for NarrativeArc {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|arc| arc.id() == s).ok_or(())
    }
}

impl fmt::Display for NarrativeArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an arc id; unknown ids are shown as-is.
pub fn arc_label(id: &str) -> &str {
    match id.parse::<NarrativeArc>() {
        Ok(arc) => arc.label(),
        Err(()) => id,
    }
}

/// Split a multi-line characters field into one entry per non-blank line.
pub fn parse_characters(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Error)]
pub enum StoryError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw story form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryForm {
    pub plot: String,
    pub genre: String,
    pub arc: String,
    /// One character per line.
    pub characters: String,
    pub temperature: String,
    pub max_tokens: String,
    pub model: Option<String>,
    pub mode: Option<String>,
    pub experiment_id: Option<String>,
    pub aoi_names: Vec<String>,
    pub strategy: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl StoryForm {
    /// Fill unset model and mode from the backend defaults.
    pub fn apply_options(&mut self, options: &OptionsResponse) {
        if self.model.is_none() {
            self.model = options.default_model.clone();
        }
        if self.mode.is_none() {
            self.mode = options.default_mode.clone();
        }
    }

    /// Replay an experiment into the form.
    ///
    /// Sampling parameters, model and mode are left as the user set them.
    pub fn load_experiment(&mut self, experiment: &Experiment) {
        self.plot = experiment.trama.clone();
        self.genre = experiment.genero.clone().unwrap_or_default();
        self.arc = experiment.arco.clone().unwrap_or_default();
        self.characters = experiment.personajes.join("\n");
        self.aoi_names = experiment.aoi_names.clone();
        self.strategy = experiment.strategy.clone();
        self.experiment_id = Some(experiment.id.clone());
    }

    /// Validate and build the request body.
    pub fn to_request(&self) -> Result<StoryRequest, FormError> {
        let plot = self.plot.trim();
        if plot.is_empty() {
            return Err(FormError::Empty("plot"));
        }
        if plot.chars().count() < MIN_PLOT_CHARS {
            return Err(FormError::TooShort {
                field: "plot",
                min: MIN_PLOT_CHARS,
            });
        }

        Ok(StoryRequest {
            trama: plot.to_string(),
            genero: optional(&self.genre),
            arco: optional(&self.arc),
            personajes: parse_characters(&self.characters),
            temperature: parse_temperature(&self.temperature)?,
            max_tokens: parse_max_tokens(&self.max_tokens)?,
            model: self.model.clone(),
            mode: self.mode.clone(),
            experiment_id: self.experiment_id.clone(),
            aoi_names: (!self.aoi_names.is_empty()).then(|| self.aoi_names.clone()),
            strategy: self.strategy.clone(),
        })
    }

    /// Validate, post, and return the generated story.
    pub async fn generate(&self, api: &dyn PlaygroundApi) -> Result<StoryResponse, StoryError> {
        let request = self.to_request()?;
        tracing::info!(
            mode = request.mode.as_deref().unwrap_or("default"),
            model = request.model.as_deref().unwrap_or("default"),
            experiment = request.experiment_id.as_deref().unwrap_or("-"),
            "generating story"
        );
        Ok(api.story(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lighthouse() -> Experiment {
        Experiment {
            id: "exp-lighthouse".into(),
            title: "The lighthouse".into(),
            trama: "An abandoned lighthouse predicts storms.".into(),
            genero: Some("Adventure".into()),
            arco: Some("viaje_del_heroe".into()),
            personajes: vec!["Lina, marine scientist".into(), "Eloy, retired keeper".into()],
            aoi_names: vec!["JOURNEY".into(), "CONFLICT".into()],
            strategy: Some("sequential".into()),
        }
    }

    #[test]
    fn test_arc_labels() {
        assert_eq!(arc_label("tragedia"), "Tragedia");
        assert_eq!(arc_label("maduracion"), "Historia de maduración");
        assert_eq!(arc_label("space_opera"), "space_opera");
        for arc in NarrativeArc::ALL {
            assert_eq!(arc.id().parse::<NarrativeArc>(), Ok(arc));
        }
    }

    #[test]
    fn test_parse_characters() {
        assert_eq!(
            parse_characters("Aria\n\n  Tono  \n"),
            vec!["Aria".to_string(), "Tono".to_string()]
        );
        assert!(parse_characters("  \n").is_empty());
    }

    #[test]
    fn test_plot_validation() {
        let mut form = StoryForm::default();
        assert_eq!(form.to_request(), Err(FormError::Empty("plot")));

        form.plot = " Ñandú ".into();
        assert!(form.to_request().is_ok());

        form.plot = "cat".into();
        assert_eq!(
            form.to_request(),
            Err(FormError::TooShort {
                field: "plot",
                min: MIN_PLOT_CHARS
            })
        );
    }

    #[test]
    fn test_sampling_validation() {
        let mut form = StoryForm {
            plot: "A long enough plot".into(),
            temperature: "3".into(),
            ..Default::default()
        };
        assert!(matches!(form.to_request(), Err(FormError::OutOfRange { .. })));

        form.temperature = "1.2".into();
        form.max_tokens = "0".into();
        assert!(matches!(form.to_request(), Err(FormError::OutOfRange { .. })));
    }

    #[test]
    fn test_experiment_playback() {
        let mut form = StoryForm {
            temperature: "0.9".into(),
            ..Default::default()
        };
        form.load_experiment(&lighthouse());

        let request = form.to_request().unwrap();
        assert_eq!(request.trama, "An abandoned lighthouse predicts storms.");
        assert_eq!(request.arco.as_deref(), Some("viaje_del_heroe"));
        assert_eq!(request.personajes.len(), 2);
        assert_eq!(request.experiment_id.as_deref(), Some("exp-lighthouse"));
        assert_eq!(
            request.aoi_names,
            Some(vec!["JOURNEY".to_string(), "CONFLICT".to_string()])
        );
        assert_eq!(request.temperature, Some(0.9));
    }

    #[test]
    fn test_options_fill_only_unset() {
        let options = OptionsResponse {
            default_model: Some("gpt-4o-mini".into()),
            default_mode: Some("0".into()),
            ..Default::default()
        };
        let mut form = StoryForm {
            mode: Some("2".into()),
            ..Default::default()
        };
        form.apply_options(&options);
        assert_eq!(form.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(form.mode.as_deref(), Some("2"));
    }

    #[test]
    fn test_empty_aoi_list_is_null() {
        let form = StoryForm {
            plot: "Five or more".into(),
            ..Default::default()
        };
        assert_eq!(form.to_request().unwrap().aoi_names, None);
    }
}
