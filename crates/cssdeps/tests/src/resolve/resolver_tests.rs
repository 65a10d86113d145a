use std::collections::HashMap;
use std::sync::Mutex;

use super::*;

struct Scripted {
    answers: HashMap<&'static str, &'static str>,
    calls: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(answers: &[(&'static str, &'static str)]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Resolver for Scripted {
    fn resolve(
        &self,
        context: &Path,
        request: &str,
    ) -> impl Future<Output = Result<String, ResolveError>> + Send {
        self.calls.lock().unwrap().push(request.to_string());
        let answer = self.answers.get(request).map(|target| target.to_string()).ok_or_else(|| ResolveError::NotFound {
            request: request.to_string(),
            context: context.to_path_buf(),
        });
        async move { answer }
    }
}

#[tokio::test]
async fn first_success_wins() {
    let resolver = Scripted::new(&[("./b.png", "/abs/b.png"), ("b.png", "/other/b.png")]);
    let candidates = vec!["./b.png".to_string(), "b.png".to_string()];
    let target = resolver.resolve_first(Path::new("/ctx"), &candidates).await;
    assert_eq!(target, Ok("/abs/b.png".to_string()));
    assert_eq!(*resolver.calls.lock().unwrap(), vec!["./b.png"]);
}

#[tokio::test]
async fn duplicates_are_tried_once_and_last_error_returned() {
    let resolver = Scripted::new(&[]);
    let candidates = vec!["./a.png".to_string(), "./a.png".to_string(), "a.png".to_string()];
    let err = resolver.resolve_first(Path::new("/ctx"), &candidates).await.unwrap_err();
    assert_eq!(
        err,
        ResolveError::NotFound {
            request: "a.png".to_string(),
            context: PathBuf::from("/ctx"),
        }
    );
    assert_eq!(*resolver.calls.lock().unwrap(), vec!["./a.png", "a.png"]);
    assert_eq!(err.to_string(), "can't resolve 'a.png' in '/ctx'");
}

#[tokio::test]
async fn no_candidates_is_an_invalid_request() {
    let resolver = Scripted::new(&[]);
    let err = resolver.resolve_first(Path::new("/ctx"), &[]).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidRequest { .. }));
}

#[tokio::test]
async fn shared_resolvers_forward() {
    let resolver = Arc::new(Scripted::new(&[("./a.css", "/abs/a.css")]));
    assert_eq!(resolver.resolve(Path::new("/"), "./a.css").await, Ok("/abs/a.css".to_string()));
}
