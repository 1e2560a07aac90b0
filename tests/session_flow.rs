//! End-to-end flows through the public session API with an in-memory service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use nutrilin::api::{ApiError, ApiResult, NutritionApi};
use nutrilin::models::{
    CalculationRequest, CalculationResult, FoodItem, MacroPercentages, MealItem, SearchRequest,
};
use nutrilin::session::{DisplayMode, Intent, Session, SessionSettings};
use nutrilin::view::{parse_command, render, Command};

/// Small fixed catalogue; a calculation reports 0.1u insulin per gram of carbs
struct CatalogueApi {
    foods: Vec<FoodItem>,
    searches: Mutex<Vec<String>>,
    meals: Mutex<Vec<Vec<MealItem>>>,
    broken: Mutex<bool>,
}

impl CatalogueApi {
    fn new() -> Self {
        let mut bread = FoodItem::new(1, "Bread, wholemeal");
        bread.carbohydrate_g = 42.0;
        bread.energy_kcal = 247.0;
        let mut apple = FoodItem::new(5, "Apple, raw");
        apple.carbohydrate_g = 14.0;
        apple.energy_kcal = 52.0;
        let mut cheese = FoodItem::new(9, "Cheese, cheddar");
        cheese.lipid_g = 33.0;
        cheese.protein_g = 25.0;
        Self {
            foods: vec![bread, apple, cheese],
            searches: Mutex::new(Vec::new()),
            meals: Mutex::new(Vec::new()),
            broken: Mutex::new(false),
        }
    }
}

#[async_trait]
impl NutritionApi for CatalogueApi {
    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<FoodItem>> {
        self.searches.lock().unwrap().push(request.name.clone());
        if *self.broken.lock().unwrap() {
            return Err(ApiError::MalformedItems);
        }
        let needle = request.name.to_lowercase();
        Ok(self
            .foods
            .iter()
            .filter(|f| f.description.to_lowercase().contains(&needle))
            .take(request.max_results as usize)
            .cloned()
            .collect())
    }

    async fn calculate(&self, request: &CalculationRequest) -> ApiResult<CalculationResult> {
        self.meals.lock().unwrap().push(request.meal.clone());
        let carbs: f64 = request
            .meal
            .iter()
            .filter_map(|m| {
                self.foods
                    .iter()
                    .find(|f| f.id == m.food_id)
                    .map(|f| f.carbohydrate_g * m.grams as f64 / 100.0)
            })
            .sum();
        Ok(CalculationResult {
            insulin_needed: carbs / request.factor_insulin_cho,
            energy_kcal: 0.0,
            protein_g: 0.0,
            lipid_g: 0.0,
            carbohydrate_g: carbs,
            fiber_g: 0.0,
            percentages: MacroPercentages {
                carbohydrate: 100.0,
                protein: 0.0,
                lipid: 0.0,
            },
        })
    }
}

async fn settle(session: &mut Session) {
    while let Ok(Some(_)) = tokio::time::timeout(Duration::from_secs(5), session.step()).await {}
}

fn apply_line(session: &mut Session, line: &str) -> bool {
    match parse_command(line).unwrap() {
        Command::Intent(intent) => session.apply(intent),
        other => panic!("not an intent: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn compose_meal_from_typed_commands() {
    let api = Arc::new(CatalogueApi::new());
    let mut session = Session::new(api.clone(), SessionSettings::default());
    session.start();
    settle(&mut session).await;
    assert_eq!(session.view().candidates.len(), 3);
    assert_eq!(session.view().mode(), DisplayMode::Empty);

    for line in ["b", "br", "bread"] {
        apply_line(&mut session, line);
    }
    settle(&mut session).await;
    assert_eq!(*api.searches.lock().unwrap(), vec!["".to_string(), "bread".to_string()]);
    assert_eq!(session.view().candidates.len(), 1);

    apply_line(&mut session, "toggle 1");
    apply_line(&mut session, "qty 1 50");
    settle(&mut session).await;

    let view = session.view();
    let result = view.result.clone().unwrap();
    assert!((result.carbohydrate_g - 21.0).abs() < 1e-9);
    assert!((result.insulin_needed - 2.1).abs() < 1e-9);
    assert_eq!(*api.meals.lock().unwrap(), vec![vec![MealItem { food_id: 1, grams: 50 }]]);

    let frame = render(&view);
    assert!(frame.contains("2.1u"));
    assert!(frame.contains("Selected (1):"));
}

#[tokio::test(start_paused = true)]
async fn meal_keeps_selection_order_across_searches() {
    let api = Arc::new(CatalogueApi::new());
    let mut session = Session::new(api.clone(), SessionSettings::default());
    session.start();
    settle(&mut session).await;

    session.apply(Intent::Toggle(9));
    session.apply(Intent::Toggle(5));
    session.apply(Intent::QueryChanged("bread".to_string()));
    settle(&mut session).await;
    session.apply(Intent::Toggle(1));
    settle(&mut session).await;

    let meals = api.meals.lock().unwrap().clone();
    let last = meals.last().unwrap();
    let ids: Vec<i64> = last.iter().map(|m| m.food_id).collect();
    assert_eq!(ids, vec![9, 5, 1]);
    assert!(last.iter().all(|m| m.grams == 100));
}

#[tokio::test(start_paused = true)]
async fn broken_search_payload_raises_notice_and_keeps_list() {
    let api = Arc::new(CatalogueApi::new());
    let mut session = Session::new(api.clone(), SessionSettings::default());
    session.start();
    settle(&mut session).await;
    let before = session.view().candidates;

    *api.broken.lock().unwrap() = true;
    session.apply(Intent::QueryChanged("cheese".to_string()));
    settle(&mut session).await;

    assert_eq!(session.take_notices().len(), 1);
    assert_eq!(session.view().candidates, before);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_meal_drops_result_without_request() {
    let api = Arc::new(CatalogueApi::new());
    let mut session = Session::new(api.clone(), SessionSettings::default());
    session.start();
    settle(&mut session).await;

    session.apply(Intent::Toggle(5));
    settle(&mut session).await;
    assert!(session.view().result.is_some());

    session.apply(Intent::Toggle(5));
    settle(&mut session).await;

    let view = session.view();
    assert!(view.result.is_none());
    assert!(!view.calculating);
    assert_eq!(api.meals.lock().unwrap().len(), 1);
}
