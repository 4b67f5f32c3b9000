use rand::Rng;

/// Desktop browser user agents rotated across requests.
const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Fixed pool of user-agent strings; one is picked at random per attempt.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Pool with a custom set of agents. Falls back to the defaults when empty.
    pub fn new(agents: Vec<String>) -> Self {
        if agents.is_empty() {
            return Self::default();
        }
        Self { agents }
    }

    /// Pick a random agent.
    pub fn random(&self) -> &str {
        let idx = rand::thread_rng().gen_range(0..self.agents.len());
        &self.agents[idx]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.iter().any(|a| a == agent)
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: DEFAULT_USER_AGENTS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_agent_comes_from_pool() {
        let pool = UserAgentPool::default();
        for _ in 0..20 {
            assert!(pool.contains(pool.random()));
        }
    }

    #[test]
    fn test_agent_variation() {
        // Probabilistic: 4^-29 chance of a false failure
        let pool = UserAgentPool::default();
        let first = pool.random().to_string();
        let all_same = (0..30).all(|_| pool.random() == first);
        assert!(!all_same, "Expected variation in user agents");
    }

    #[test]
    fn test_empty_pool_falls_back_to_defaults() {
        let pool = UserAgentPool::new(Vec::new());
        assert_eq!(pool.len(), DEFAULT_USER_AGENTS.len());
    }
}
