//! Reference rows and default documents written by the migration steps.

use serde_json::{json, Value};

/// `(id, name)` providers known to 0.1.0.
pub const PROVIDERS_V0_1_0: &[(i64, &str)] = &[
    (1, "FakeYou"),
    (2, "Uberduck"),
    (3, "ElevenLabs"),
    (4, "OpenAI"),
    (5, "AWSPolly"),
    (8, "Replicate"),
    (10, "Azure OpenAI"),
    (11, "Huggingface"),
    (12, "Ollama"),
    (13, "VertexAI Google"),
    (14, "PaLM API Google"),
    (15, "Anthropic"),
    (16, "AWS Sagemaker"),
    (17, "AWS Bedrock"),
    (18, "Anyscale"),
    (19, "Perplexity AI"),
    (20, "VLLM"),
    (21, "DeepInfra"),
    (22, "AI21"),
    (23, "NLP Cloud"),
    (25, "Cohere"),
    (26, "Together AI"),
    (27, "Aleph Alpha"),
    (28, "Baseten"),
    (29, "OpenRouter"),
    (30, "Custom API Server"),
    (31, "Petals"),
];

/// An API provider row from 0.2.0 onwards.
#[derive(Debug, Clone, Copy)]
pub struct ApiSeed {
    pub id: i64,
    pub name: &'static str,
    /// `$ENV_VAR` placeholder resolved by the client at call time.
    pub priv_key: &'static str,
    pub litellm_prefix: Option<&'static str>,
}

impl ApiSeed {
    pub fn config(&self) -> String {
        match self.litellm_prefix {
            Some(prefix) => json!({ "litellm_prefix": prefix }).to_string(),
            None => "{}".to_string(),
        }
    }
}

const fn api(
    id: i64,
    name: &'static str,
    priv_key: &'static str,
    litellm_prefix: Option<&'static str>,
) -> ApiSeed {
    ApiSeed {
        id,
        name,
        priv_key,
        litellm_prefix,
    }
}

pub const API_PROVIDERS: &[ApiSeed] = &[
    api(1, "FakeYou", "", None),
    api(2, "Uberduck", "", None),
    api(3, "ElevenLabs", "", None),
    api(4, "OpenAI", "$OPENAI_API_KEY", None),
    api(5, "AWSPolly", "", None),
    api(8, "Replicate", "", Some("replicate")),
    api(10, "Azure OpenAI", "", Some("azure")),
    api(11, "Huggingface", "", Some("huggingface")),
    api(12, "Ollama", "", Some("ollama")),
    api(13, "VertexAI Google", "", None),
    api(14, "PaLM API Google", "", Some("palm")),
    api(15, "Anthropic", "$ANTHROPIC_API_KEY", None),
    api(16, "AWS Sagemaker", "", Some("sagemaker")),
    api(17, "AWS Bedrock", "", Some("bedrock")),
    api(18, "Anyscale", "", Some("anyscale")),
    api(19, "Perplexity AI", "$PERPLEXITYAI_API_KEY", Some("perplexity")),
    api(20, "VLLM", "", Some("vllm")),
    api(21, "DeepInfra", "", Some("deepinfra")),
    api(22, "AI21", "", None),
    api(23, "NLP Cloud", "", None),
    api(25, "Cohere", "", None),
    api(26, "Together AI", "", Some("together_ai")),
    api(27, "Aleph Alpha", "", None),
    api(28, "Baseten", "", Some("baseten")),
    api(29, "OpenRouter", "", Some("openrouter")),
    api(30, "Custom API Server", "", None),
    api(31, "Petals", "", Some("petals")),
    api(32, "Mistral", "$MISTRAL_API_KEY", Some("mistral")),
    api(33, "Groq", "", Some("groq")),
    api(34, "Cloudflare", "", Some("cloudflare")),
    api(35, "Voyage", "", Some("voyage")),
];

/// `(id, api_id, alias, model_name)` in the 0.1.0 models shape.
/// Superseded wholesale by [`MODELS`] in 0.2.0.
pub const MODELS_V0_1_0: &[(i64, i64, &str, &str)] = &[
    (1, 4, "GPT 3.5 Turbo", "gpt-3.5-turbo"),
    (2, 4, "GPT 3.5 Turbo 16k", "gpt-3.5-turbo-16k"),
    (3, 4, "GPT 3.5 Turbo (F)", "gpt-3.5-turbo-0613"),
    (4, 4, "GPT 3.5 Turbo 16k (F)", "gpt-3.5-turbo-16k-0613"),
    (5, 4, "GPT 4", "gpt-4"),
    (6, 4, "GPT 4 32k", "gpt-4-32k"),
    (7, 4, "GPT 4 (F)", "gpt-4-0613"),
    (8, 4, "GPT 32k (F)", "gpt-4-32k-0613"),
    (9, 8, "replicate/llama-2-70b-chat:2796ee9483c3fd7aa2e171d38f4ca12251a30609463dcfd4cd76703f22e96cdf", "replicate/llama-2-70b-chat:2796ee9483c3fd7aa2e171d38f4ca12251a30609463dcfd4cd76703f22e96cdf"),
    (10, 8, "replicate/a16z-infra/llama-2-13b-chat:2a7f981751ec7fdf87b5b91ad4db53683a98082e9ff7bfd12c8cd5ea85980a52", "replicate/a16z-infra/llama-2-13b-chat:2a7f981751ec7fdf87b5b91ad4db53683a98082e9ff7bfd12c8cd5ea85980a52"),
    (11, 8, "replicate/vicuna-13b:6282abe6a492de4145d7bb601023762212f9ddbbe78278bd6771c8b3b2f2a13b", "replicate/vicuna-13b:6282abe6a492de4145d7bb601023762212f9ddbbe78278bd6771c8b3b2f2a13b"),
    (12, 8, "replicate/daanelson/flan-t5-large:ce962b3f6792a57074a601d3979db5839697add2e4e02696b3ced4c022d4767f", "replicate/daanelson/flan-t5-large:ce962b3f6792a57074a601d3979db5839697add2e4e02696b3ced4c022d4767f"),
    (13, 8, "replicate/custom-llm-version-id", "replicate/custom-llm-version-id"),
    (14, 8, "replicate/deployments/ishaan-jaff/ishaan-mistral", "replicate/deployments/ishaan-jaff/ishaan-mistral"),
    (15, 10, "azure/gpt-4", "azure/gpt-4"),
    (16, 10, "azure/gpt-4-0314", "azure/gpt-4-0314"),
    (17, 10, "azure/gpt-4-0613", "azure/gpt-4-0613"),
    (18, 10, "azure/gpt-4-32k", "azure/gpt-4-32k"),
    (19, 10, "azure/gpt-4-32k-0314", "azure/gpt-4-32k-0314"),
    (20, 10, "azure/gpt-4-32k-0613", "azure/gpt-4-32k-0613"),
    (21, 10, "azure/gpt-3.5-turbo", "azure/gpt-3.5-turbo"),
    (22, 10, "azure/gpt-3.5-turbo-0301", "azure/gpt-3.5-turbo-0301"),
    (23, 10, "azure/gpt-3.5-turbo-0613", "azure/gpt-3.5-turbo-0613"),
    (24, 10, "azure/gpt-3.5-turbo-16k", "azure/gpt-3.5-turbo-16k"),
    (25, 10, "azure/gpt-3.5-turbo-16k-0613", "azure/gpt-3.5-turbo-16k-0613"),
    (26, 11, "huggingface/mistralai/Mistral-7B-Instruct-v0.1", "huggingface/mistralai/Mistral-7B-Instruct-v0.1"),
    (27, 11, "huggingface/meta-llama/Llama-2-7b-chat", "huggingface/meta-llama/Llama-2-7b-chat"),
    (28, 11, "huggingface/tiiuae/falcon-7b-instruct", "huggingface/tiiuae/falcon-7b-instruct"),
    (29, 11, "huggingface/mosaicml/mpt-7b-chat", "huggingface/mosaicml/mpt-7b-chat"),
    (30, 11, "huggingface/codellama/CodeLlama-34b-Instruct-hf", "huggingface/codellama/CodeLlama-34b-Instruct-hf"),
    (31, 11, "huggingface/WizardLM/WizardCoder-Python-34B-V1.0", "huggingface/WizardLM/WizardCoder-Python-34B-V1.0"),
    (32, 11, "huggingface/Phind/Phind-CodeLlama-34B-v2", "huggingface/Phind/Phind-CodeLlama-34B-v2"),
    (33, 12, "Mistral", "ollama/mistral"),
    (34, 12, "Llama2 7B", "ollama/llama2"),
    (35, 12, "Llama2 13B", "ollama/llama2:13b"),
    (36, 12, "Llama2 70B", "ollama/llama2:70b"),
    (37, 12, "Llama2 Uncensored", "ollama/llama2-uncensored"),
    (38, 12, "Code Llama", "ollama/codellama"),
    (39, 12, "Llama2 Uncensored", "ollama/llama2-uncensored"),
    (40, 12, "Orca Mini", "ollama/orca-mini"),
    (41, 12, "Vicuna", "ollama/vicuna"),
    (42, 12, "Nous-Hermes", "ollama/nous-hermes"),
    (43, 12, "Nous-Hermes 13B", "ollama/nous-hermes:13b"),
    (44, 12, "Wizard Vicuna Uncensored", "ollama/wizard-vicuna"),
    (45, 13, "chat-bison-32k", "chat-bison-32k"),
    (46, 13, "chat-bison", "chat-bison"),
    (47, 13, "chat-bison@001", "chat-bison@001"),
    (48, 13, "codechat-bison", "codechat-bison"),
    (49, 13, "codechat-bison-32k", "codechat-bison-32k"),
    (50, 13, "codechat-bison@001", "codechat-bison@001"),
    (51, 13, "text-bison", "text-bison"),
    (52, 13, "text-bison@001", "text-bison@001"),
    (53, 13, "code-bison", "code-bison"),
    (54, 13, "code-bison@001", "code-bison@001"),
    (55, 13, "code-gecko@001", "code-gecko@001"),
    (56, 13, "code-gecko@latest", "code-gecko@latest"),
    (57, 14, "palm/chat-bison", "palm/chat-bison"),
    (58, 15, "claude-instant-1", "claude-instant-1"),
    (59, 15, "claude-instant-1.2", "claude-instant-1.2"),
    (60, 15, "claude-2", "claude-2"),
    (61, 16, "sagemaker/jumpstart-dft-meta-textgeneration-llama-2-7b", "sagemaker/jumpstart-dft-meta-textgeneration-llama-2-7b"),
    (62, 16, "sagemaker/your-endpoint", "sagemaker/your-endpoint"),
    (63, 17, "anthropic.claude-v2", "anthropic.claude-v2"),
    (64, 17, "anthropic.claude-instant-v1", "anthropic.claude-instant-v1"),
    (65, 17, "anthropic.claude-v1", "anthropic.claude-v1"),
    (66, 17, "amazon.titan-text-lite-v1", "amazon.titan-text-lite-v1"),
    (67, 17, "amazon.titan-text-express-v1", "amazon.titan-text-express-v1"),
    (68, 17, "cohere.command-text-v14", "cohere.command-text-v14"),
    (69, 17, "ai21.j2-mid-v1", "ai21.j2-mid-v1"),
    (70, 17, "ai21.j2-ultra-v1", "ai21.j2-ultra-v1"),
    (71, 17, "meta.llama2-13b-chat-v1", "meta.llama2-13b-chat-v1"),
    (72, 18, "anyscale/meta-llama/Llama-2-7b-chat-hf", "anyscale/meta-llama/Llama-2-7b-chat-hf"),
    (73, 18, "anyscale/meta-llama/Llama-2-13b-chat-hf", "anyscale/meta-llama/Llama-2-13b-chat-hf"),
    (74, 18, "anyscale/meta-llama/Llama-2-70b-chat-hf", "anyscale/meta-llama/Llama-2-70b-chat-hf"),
    (75, 18, "anyscale/mistralai/Mistral-7B-Instruct-v0.1", "anyscale/mistralai/Mistral-7B-Instruct-v0.1"),
    (76, 18, "anyscale/codellama/CodeLlama-34b-Instruct-hf", "anyscale/codellama/CodeLlama-34b-Instruct-hf"),
    (77, 19, "perplexity/codellama-34b-instruct", "perplexity/codellama-34b-instruct"),
    (78, 19, "perplexity/llama-2-13b-chat", "perplexity/llama-2-13b-chat"),
    (79, 19, "perplexity/llama-2-70b-chat", "perplexity/llama-2-70b-chat"),
    (80, 19, "perplexity/mistral-7b-instruct", "perplexity/mistral-7b-instruct"),
    (81, 19, "perplexity/replit-code-v1.5-3b", "perplexity/replit-code-v1.5-3b"),
    (82, 20, "vllm/meta-llama/Llama-2-7b", "vllm/meta-llama/Llama-2-7b"),
    (83, 20, "vllm/tiiuae/falcon-7b-instruct", "vllm/tiiuae/falcon-7b-instruct"),
    (84, 20, "vllm/mosaicml/mpt-7b-chat", "vllm/mosaicml/mpt-7b-chat"),
    (85, 20, "vllm/codellama/CodeLlama-34b-Instruct-hf", "vllm/codellama/CodeLlama-34b-Instruct-hf"),
    (86, 20, "vllm/WizardLM/WizardCoder-Python-34B-V1.0", "vllm/WizardLM/WizardCoder-Python-34B-V1.0"),
    (87, 20, "vllm/Phind/Phind-CodeLlama-34B-v2", "vllm/Phind/Phind-CodeLlama-34B-v2"),
    (88, 21, "deepinfra/meta-llama/Llama-2-70b-chat-hf", "deepinfra/meta-llama/Llama-2-70b-chat-hf"),
    (89, 21, "deepinfra/meta-llama/Llama-2-7b-chat-hf", "deepinfra/meta-llama/Llama-2-7b-chat-hf"),
    (90, 21, "deepinfra/meta-llama/Llama-2-13b-chat-hf", "deepinfra/meta-llama/Llama-2-13b-chat-hf"),
    (91, 21, "deepinfra/codellama/CodeLlama-34b-Instruct-hf", "deepinfra/codellama/CodeLlama-34b-Instruct-hf"),
    (92, 21, "deepinfra/mistralai/Mistral-7B-Instruct-v0.1", "deepinfra/mistralai/Mistral-7B-Instruct-v0.1"),
    (93, 21, "deepinfra/jondurbin/airoboros-l2-70b-gpt4-1.4.1", "deepinfra/jondurbin/airoboros-l2-70b-gpt4-1.4.1"),
    (94, 22, "j2-light", "j2-light"),
    (95, 22, "j2-mid", "j2-mid"),
    (96, 22, "j2-ultra", "j2-ultra"),
    (97, 23, "dolphin", "dolphin"),
    (98, 23, "chatdolphin", "chatdolphin"),
    (99, 25, "command", "command"),
    (100, 25, "command-light", "command-light"),
    (101, 25, "command-medium", "command-medium"),
    (102, 25, "command-medium-beta", "command-medium-beta"),
    (103, 25, "command-xlarge-beta", "command-xlarge-beta"),
    (104, 25, "command-nightly", "command-nightly"),
    (105, 26, "together_ai/togethercomputer/llama-2-70b-chat", "together_ai/togethercomputer/llama-2-70b-chat"),
    (106, 26, "together_ai/togethercomputer/llama-2-70b", "together_ai/togethercomputer/llama-2-70b"),
    (107, 26, "together_ai/togethercomputer/LLaMA-2-7B-32K", "together_ai/togethercomputer/LLaMA-2-7B-32K"),
    (108, 26, "together_ai/togethercomputer/Llama-2-7B-32K-Instruct", "together_ai/togethercomputer/Llama-2-7B-32K-Instruct"),
    (109, 26, "together_ai/togethercomputer/llama-2-7b", "together_ai/togethercomputer/llama-2-7b"),
    (110, 26, "together_ai/togethercomputer/falcon-40b-instruct", "together_ai/togethercomputer/falcon-40b-instruct"),
    (111, 26, "together_ai/togethercomputer/falcon-7b-instruct", "together_ai/togethercomputer/falcon-7b-instruct"),
    (112, 26, "together_ai/togethercomputer/alpaca-7b", "together_ai/togethercomputer/alpaca-7b"),
    (113, 26, "together_ai/HuggingFaceH4/starchat-alpha", "together_ai/HuggingFaceH4/starchat-alpha"),
    (114, 26, "together_ai/togethercomputer/CodeLlama-34b", "together_ai/togethercomputer/CodeLlama-34b"),
    (115, 26, "together_ai/togethercomputer/CodeLlama-34b-Instruct", "together_ai/togethercomputer/CodeLlama-34b-Instruct"),
    (116, 26, "together_ai/togethercomputer/CodeLlama-34b-Python", "together_ai/togethercomputer/CodeLlama-34b-Python"),
    (117, 26, "together_ai/defog/sqlcoder", "together_ai/defog/sqlcoder"),
    (118, 26, "together_ai/NumbersStation/nsql-llama-2-7B", "together_ai/NumbersStation/nsql-llama-2-7B"),
    (119, 26, "together_ai/WizardLM/WizardCoder-15B-V1.0", "together_ai/WizardLM/WizardCoder-15B-V1.0"),
    (120, 26, "together_ai/WizardLM/WizardCoder-Python-34B-V1.0", "together_ai/WizardLM/WizardCoder-Python-34B-V1.0"),
    (121, 26, "together_ai/NousResearch/Nous-Hermes-Llama2-13b", "together_ai/NousResearch/Nous-Hermes-Llama2-13b"),
    (122, 26, "together_ai/Austism/chronos-hermes-13b", "together_ai/Austism/chronos-hermes-13b"),
    (123, 26, "together_ai/upstage/SOLAR-0-70b-16bit", "together_ai/upstage/SOLAR-0-70b-16bit"),
    (124, 26, "together_ai/WizardLM/WizardLM-70B-V1.0", "together_ai/WizardLM/WizardLM-70B-V1.0"),
    (125, 27, "luminous-base", "luminous-base"),
    (126, 27, "luminous-base-control", "luminous-base-control"),
    (127, 27, "luminous-extended", "luminous-extended"),
    (128, 27, "luminous-extended-control", "luminous-extended-control"),
    (129, 27, "luminous-supreme", "luminous-supreme"),
    (130, 27, "luminous-supreme-control", "luminous-supreme-control"),
    (131, 28, "Falcon 7B", "baseten/qvv0xeq"),
    (132, 28, "Wizard LM", "baseten/q841o8w"),
    (133, 28, "MPT 7B Base", "baseten/31dxrj3"),
    (134, 29, "openrouter/openai/gpt-3.5-turbo", "openrouter/openai/gpt-3.5-turbo"),
    (135, 29, "openrouter/openai/gpt-3.5-turbo-16k", "openrouter/openai/gpt-3.5-turbo-16k"),
    (136, 29, "openrouter/openai/gpt-4", "openrouter/openai/gpt-4"),
    (137, 29, "openrouter/openai/gpt-4-32k", "openrouter/openai/gpt-4-32k"),
    (138, 29, "openrouter/anthropic/claude-2", "openrouter/anthropic/claude-2"),
    (139, 29, "openrouter/anthropic/claude-instant-v1", "openrouter/anthropic/claude-instant-v1"),
    (140, 29, "openrouter/google/palm-2-chat-bison", "openrouter/google/palm-2-chat-bison"),
    (141, 29, "openrouter/google/palm-2-codechat-bison", "openrouter/google/palm-2-codechat-bison"),
    (142, 29, "openrouter/meta-llama/llama-2-13b-chat", "openrouter/meta-llama/llama-2-13b-chat"),
    (143, 29, "openrouter/meta-llama/llama-2-70b-chat", "openrouter/meta-llama/llama-2-70b-chat"),
];

/// `(id, api_id, name, model_name)` from 0.2.0 onwards; `model_name` lands in `config`.
pub const MODELS: &[(i64, i64, &str, &str)] = &[
    (1, 4, "GPT 3.5 Turbo", "gpt-3.5-turbo"),
    (2, 4, "GPT 3.5 Turbo 16k", "gpt-3.5-turbo-16k"),
    (3, 4, "GPT 3.5 Turbo (F)", "gpt-3.5-turbo-1106"),
    (4, 4, "GPT 3.5 Turbo 16k (F)", "gpt-3.5-turbo-16k-0613"),
    (5, 4, "GPT 4", "gpt-4"),
    (6, 4, "GPT 4 32k", "gpt-4-32k"),
    (7, 4, "GPT 4 (F)", "gpt-4-0613"),
    (8, 4, "GPT 4 32k (F)", "gpt-4-32k-0613"),
    (9, 8, "llama-2-70b-chat:2796ee9483c3fd7aa2e171d38f4ca12251a30609463dcfd4cd76703f22e96cdf", "llama-2-70b-chat:2796ee9483c3fd7aa2e171d38f4ca12251a30609463dcfd4cd76703f22e96cdf"),
    (10, 8, "a16z-infra/llama-2-13b-chat:2a7f981751ec7fdf87b5b91ad4db53683a98082e9ff7bfd12c8cd5ea85980a52", "a16z-infra/llama-2-13b-chat:2a7f981751ec7fdf87b5b91ad4db53683a98082e9ff7bfd12c8cd5ea85980a52"),
    (11, 8, "vicuna-13b:6282abe6a492de4145d7bb601023762212f9ddbbe78278bd6771c8b3b2f2a13b", "vicuna-13b:6282abe6a492de4145d7bb601023762212f9ddbbe78278bd6771c8b3b2f2a13b"),
    (12, 8, "daanelson/flan-t5-large:ce962b3f6792a57074a601d3979db5839697add2e4e02696b3ced4c022d4767f", "daanelson/flan-t5-large:ce962b3f6792a57074a601d3979db5839697add2e4e02696b3ced4c022d4767f"),
    (13, 8, "custom-llm-version-id", "custom-llm-version-id"),
    (14, 8, "deployments/ishaan-jaff/ishaan-mistral", "deployments/ishaan-jaff/ishaan-mistral"),
    (15, 10, "azure/gpt-4", "gpt-4"),
    (16, 10, "azure/gpt-4-0314", "gpt-4-0314"),
    (17, 10, "azure/gpt-4-0613", "gpt-4-0613"),
    (18, 10, "azure/gpt-4-32k", "gpt-4-32k"),
    (19, 10, "azure/gpt-4-32k-0314", "gpt-4-32k-0314"),
    (20, 10, "azure/gpt-4-32k-0613", "gpt-4-32k-0613"),
    (21, 10, "azure/gpt-3.5-turbo", "gpt-3.5-turbo"),
    (22, 10, "azure/gpt-3.5-turbo-0301", "gpt-3.5-turbo-0301"),
    (23, 10, "azure/gpt-3.5-turbo-0613", "gpt-3.5-turbo-0613"),
    (24, 10, "azure/gpt-3.5-turbo-16k", "gpt-3.5-turbo-16k"),
    (25, 10, "azure/gpt-3.5-turbo-16k-0613", "gpt-3.5-turbo-16k-0613"),
    (26, 11, "mistralai/Mistral-7B-Instruct-v0.1", "mistralai/Mistral-7B-Instruct-v0.1"),
    (27, 11, "meta-llama/Llama-2-7b-chat", "meta-llama/Llama-2-7b-chat"),
    (28, 11, "tiiuae/falcon-7b-instruct", "tiiuae/falcon-7b-instruct"),
    (29, 11, "mosaicml/mpt-7b-chat", "mosaicml/mpt-7b-chat"),
    (30, 11, "codellama/CodeLlama-34b-Instruct-hf", "codellama/CodeLlama-34b-Instruct-hf"),
    (31, 11, "WizardLM/WizardCoder-Python-34B-V1.0", "WizardLM/WizardCoder-Python-34B-V1.0"),
    (32, 11, "Phind/Phind-CodeLlama-34B-v2", "Phind/Phind-CodeLlama-34B-v2"),
    (33, 12, "Mistral", "mistral"),
    (34, 12, "Llama2 7B", "llama2"),
    (35, 12, "Llama2 13B", "llama2:13b"),
    (36, 12, "Llama2 70B", "llama2:70b"),
    (37, 12, "Llama2 Uncensored", "llama2-uncensored"),
    (38, 12, "Code Llama", "codellama"),
    (39, 12, "Llama2 Uncensored", "llama2-uncensored"),
    (40, 12, "Orca Mini", "orca-mini"),
    (41, 12, "Vicuna", "vicuna"),
    (42, 12, "Nous-Hermes", "nous-hermes"),
    (43, 12, "Nous-Hermes 13B", "nous-hermes:13b"),
    (44, 12, "Wizard Vicuna Uncensored", "wizard-vicuna"),
    (45, 13, "chat-bison-32k", "chat-bison-32k"),
    (46, 13, "chat-bison", "chat-bison"),
    (47, 13, "chat-bison@001", "chat-bison@001"),
    (48, 13, "codechat-bison", "codechat-bison"),
    (49, 13, "codechat-bison-32k", "codechat-bison-32k"),
    (50, 13, "codechat-bison@001", "codechat-bison@001"),
    (51, 13, "text-bison", "text-bison"),
    (52, 13, "text-bison@001", "text-bison@001"),
    (53, 13, "code-bison", "code-bison"),
    (54, 13, "code-bison@001", "code-bison@001"),
    (55, 13, "code-gecko@001", "code-gecko@001"),
    (56, 13, "code-gecko@latest", "code-gecko@latest"),
    (57, 14, "palm/chat-bison", "chat-bison"),
    (58, 15, "claude-instant-1", "claude-instant-1"),
    (59, 15, "claude-instant-1.2", "claude-instant-1.2"),
    (60, 15, "claude-2", "claude-2"),
    (61, 16, "jumpstart-dft-meta-textgeneration-llama-2-7b", "jumpstart-dft-meta-textgeneration-llama-2-7b"),
    (62, 16, "your-endpoint", "your-endpoint"),
    (63, 17, "anthropic.claude-v2", "anthropic.claude-v2"),
    (64, 17, "anthropic.claude-instant-v1", "anthropic.claude-instant-v1"),
    (65, 17, "anthropic.claude-v1", "anthropic.claude-v1"),
    (66, 17, "amazon.titan-text-lite-v1", "amazon.titan-text-lite-v1"),
    (67, 17, "amazon.titan-text-express-v1", "amazon.titan-text-express-v1"),
    (68, 17, "cohere.command-text-v14", "cohere.command-text-v14"),
    (69, 17, "ai21.j2-mid-v1", "ai21.j2-mid-v1"),
    (70, 17, "ai21.j2-ultra-v1", "ai21.j2-ultra-v1"),
    (71, 17, "meta.llama2-13b-chat-v1", "meta.llama2-13b-chat-v1"),
    (72, 18, "meta-llama/Llama-2-7b-chat-hf", "meta-llama/Llama-2-7b-chat-hf"),
    (73, 18, "meta-llama/Llama-2-13b-chat-hf", "meta-llama/Llama-2-13b-chat-hf"),
    (74, 18, "meta-llama/Llama-2-70b-chat-hf", "meta-llama/Llama-2-70b-chat-hf"),
    (75, 18, "mistralai/Mistral-7B-Instruct-v0.1", "mistralai/Mistral-7B-Instruct-v0.1"),
    (76, 18, "codellama/CodeLlama-34b-Instruct-hf", "codellama/CodeLlama-34b-Instruct-hf"),
    (77, 19, "codellama-34b-instruct", "codellama-34b-instruct"),
    (78, 19, "llama-2-13b-chat", "llama-2-13b-chat"),
    (79, 19, "llama-2-70b-chat", "llama-2-70b-chat"),
    (80, 19, "mistral-7b-instruct", "mistral-7b-instruct"),
    (82, 20, "meta-llama/Llama-2-7b", "meta-llama/Llama-2-7b"),
    (83, 20, "tiiuae/falcon-7b-instruct", "tiiuae/falcon-7b-instruct"),
    (84, 20, "mosaicml/mpt-7b-chat", "mosaicml/mpt-7b-chat"),
    (85, 20, "codellama/CodeLlama-34b-Instruct-hf", "codellama/CodeLlama-34b-Instruct-hf"),
    (86, 20, "WizardLM/WizardCoder-Python-34B-V1.0", "WizardLM/WizardCoder-Python-34B-V1.0"),
    (87, 20, "Phind/Phind-CodeLlama-34B-v2", "Phind/Phind-CodeLlama-34B-v2"),
    (88, 21, "meta-llama/Llama-2-70b-chat-hf", "meta-llama/Llama-2-70b-chat-hf"),
    (89, 21, "meta-llama/Llama-2-7b-chat-hf", "meta-llama/Llama-2-7b-chat-hf"),
    (90, 21, "meta-llama/Llama-2-13b-chat-hf", "meta-llama/Llama-2-13b-chat-hf"),
    (91, 21, "codellama/CodeLlama-34b-Instruct-hf", "codellama/CodeLlama-34b-Instruct-hf"),
    (92, 21, "mistralai/Mistral-7B-Instruct-v0.1", "mistralai/Mistral-7B-Instruct-v0.1"),
    (93, 21, "jondurbin/airoboros-l2-70b-gpt4-1.4.1", "jondurbin/airoboros-l2-70b-gpt4-1.4.1"),
    (94, 22, "j2-light", "j2-light"),
    (95, 22, "j2-mid", "j2-mid"),
    (96, 22, "j2-ultra", "j2-ultra"),
    (97, 23, "dolphin", "dolphin"),
    (98, 23, "chatdolphin", "chatdolphin"),
    (99, 25, "command", "command"),
    (100, 25, "command-light", "command-light"),
    (101, 25, "command-medium", "command-medium"),
    (102, 25, "command-medium-beta", "command-medium-beta"),
    (103, 25, "command-xlarge-beta", "command-xlarge-beta"),
    (104, 25, "command-nightly", "command-nightly"),
    (105, 26, "togethercomputer/llama-2-70b-chat", "togethercomputer/llama-2-70b-chat"),
    (106, 26, "togethercomputer/llama-2-70b", "togethercomputer/llama-2-70b"),
    (107, 26, "togethercomputer/LLaMA-2-7B-32K", "togethercomputer/LLaMA-2-7B-32K"),
    (108, 26, "togethercomputer/Llama-2-7B-32K-Instruct", "togethercomputer/Llama-2-7B-32K-Instruct"),
    (109, 26, "togethercomputer/llama-2-7b", "togethercomputer/llama-2-7b"),
    (110, 26, "togethercomputer/falcon-40b-instruct", "togethercomputer/falcon-40b-instruct"),
    (111, 26, "togethercomputer/falcon-7b-instruct", "togethercomputer/falcon-7b-instruct"),
    (112, 26, "togethercomputer/alpaca-7b", "togethercomputer/alpaca-7b"),
    (113, 26, "HuggingFaceH4/starchat-alpha", "HuggingFaceH4/starchat-alpha"),
    (114, 26, "togethercomputer/CodeLlama-34b", "togethercomputer/CodeLlama-34b"),
    (115, 26, "togethercomputer/CodeLlama-34b-Instruct", "togethercomputer/CodeLlama-34b-Instruct"),
    (116, 26, "togethercomputer/CodeLlama-34b-Python", "togethercomputer/CodeLlama-34b-Python"),
    (117, 26, "defog/sqlcoder", "defog/sqlcoder"),
    (118, 26, "NumbersStation/nsql-llama-2-7B", "NumbersStation/nsql-llama-2-7B"),
    (119, 26, "WizardLM/WizardCoder-15B-V1.0", "WizardLM/WizardCoder-15B-V1.0"),
    (120, 26, "WizardLM/WizardCoder-Python-34B-V1.0", "WizardLM/WizardCoder-Python-34B-V1.0"),
    (121, 26, "NousResearch/Nous-Hermes-Llama2-13b", "NousResearch/Nous-Hermes-Llama2-13b"),
    (122, 26, "Austism/chronos-hermes-13b", "Austism/chronos-hermes-13b"),
    (123, 26, "upstage/SOLAR-0-70b-16bit", "upstage/SOLAR-0-70b-16bit"),
    (124, 26, "WizardLM/WizardLM-70B-V1.0", "WizardLM/WizardLM-70B-V1.0"),
    (125, 27, "luminous-base", "luminous-base"),
    (126, 27, "luminous-base-control", "luminous-base-control"),
    (127, 27, "luminous-extended", "luminous-extended"),
    (128, 27, "luminous-extended-control", "luminous-extended-control"),
    (129, 27, "luminous-supreme", "luminous-supreme"),
    (130, 27, "luminous-supreme-control", "luminous-supreme-control"),
    (131, 28, "Falcon 7B", "qvv0xeq"),
    (132, 28, "Wizard LM", "q841o8w"),
    (133, 28, "MPT 7B Base", "31dxrj3"),
    (134, 29, "openai/gpt-3.5-turbo", "openai/gpt-3.5-turbo"),
    (135, 29, "openai/gpt-3.5-turbo-16k", "openai/gpt-3.5-turbo-16k"),
    (136, 29, "openai/gpt-4", "openai/gpt-4"),
    (137, 29, "openai/gpt-4-32k", "openai/gpt-4-32k"),
    (138, 29, "anthropic/claude-2", "anthropic/claude-2"),
    (139, 29, "anthropic/claude-instant-v1", "anthropic/claude-instant-v1"),
    (140, 29, "google/palm-2-chat-bison", "google/palm-2-chat-bison"),
    (141, 29, "google/palm-2-codechat-bison", "google/palm-2-codechat-bison"),
    (142, 29, "meta-llama/llama-2-13b-chat", "meta-llama/llama-2-13b-chat"),
    (143, 29, "meta-llama/llama-2-70b-chat", "meta-llama/llama-2-70b-chat"),
    (146, 4, "GPT 4 Turbo", "gpt-4-1106-preview"),
    (153, 19, "mixtral-8x7b-instruct", "mixtral-8x7b-instruct"),
    (158, 4, "GPT 4 Vision", "gpt-4-vision-preview"),
    (162, 19, "sonar-small-chat", "sonar-small-chat"),
    (163, 19, "sonar-medium-chat", "sonar-medium-chat"),
    (164, 19, "sonar-small-online", "sonar-small-online"),
    (165, 19, "sonar-medium-online", "sonar-medium-online"),
    (166, 13, "gemini-pro", "gemini-pro"),
    (167, 13, "gemini-1.5-pro", "gemini-1.5-pro"),
    (168, 13, "gemini-pro-vision", "gemini-pro-vision"),
    (169, 13, "gemini-1.5-pro-vision", "gemini-1.5-pro-vision"),
    (173, 32, "mistral-tiny", "mistral-tiny"),
    (174, 32, "mistral-small", "mistral-small"),
    (175, 32, "mistral-medium", "mistral-medium"),
    (176, 32, "mistral-large-latest", "mistral-large-latest"),
    (177, 15, "claude-3-opus", "claude-3-opus-20240229"),
    (178, 15, "claude-3-sonnet", "claude-3-sonnet-20240229"),
    (179, 15, "claude-2.1", "claude-2.1"),
    (180, 16, "jumpstart-dft-meta-textgeneration-llama-2-7b-f", "jumpstart-dft-meta-textgeneration-llama-2-7b-f"),
    (181, 16, "jumpstart-dft-meta-textgeneration-llama-2-13b", "jumpstart-dft-meta-textgeneration-llama-2-13b"),
    (182, 16, "jumpstart-dft-meta-textgeneration-llama-2-13b-f", "jumpstart-dft-meta-textgeneration-llama-2-13b-f"),
    (183, 16, "jumpstart-dft-meta-textgeneration-llama-2-70b", "jumpstart-dft-meta-textgeneration-llama-2-70b"),
    (184, 16, "jumpstart-dft-meta-textgeneration-llama-2-70b-b-f", "jumpstart-dft-meta-textgeneration-llama-2-70b-b-f"),
    (185, 17, "anthropic.claude-3-sonnet-20240229-v1:0", "anthropic.claude-3-sonnet-20240229-v1:0"),
    (186, 17, "anthropic.claude-v2:1", "anthropic.claude-v2:1"),
    (187, 17, "meta.llama2-70b-chat-v1", "meta.llama2-70b-chat-v1"),
    (188, 17, "mistral.mistral-7b-instruct-v0:2", "mistral.mistral-7b-instruct-v0:2"),
    (189, 17, "mistral.mixtral-8x7b-instruct-v0:1", "mistral.mixtral-8x7b-instruct-v0:1"),
    (190, 33, "llama2-70b-4096", "llama2-70b-4096"),
    (191, 33, "mixtral-8x7b-32768", "mixtral-8x7b-32768"),
    (192, 34, "mistral/mistral-tiny", "mistral/mistral-tiny"),
    (193, 34, "mistral/mistral-small", "mistral/mistral-small"),
    (194, 34, "mistral/mistral-medium", "mistral/mistral-medium"),
    (195, 34, "codellama/codellama-medium", "codellama/codellama-medium"),
    (196, 35, "voyage-01", "voyage-01"),
    (197, 35, "voyage-lite-01", "voyage-lite-01"),
    (198, 35, "voyage-lite-01-instruct", "voyage-lite-01-instruct"),
    (199, 31, "petals-team/StableBeluga2", "petals-team/StableBeluga2"),
    (200, 31, "huggyllama/llama-65b", "huggyllama/llama-65b"),
    (201, 4, "GPT 4 Turbo (Unlazy?)", "gpt-4-0125-preview"),
];

pub fn model_config(model_name: &str) -> String {
    json!({ "model_name": model_name }).to_string()
}

/// Agent defaults stored in `settings.global_config` by 0.1.0.
pub fn global_config_v0_1_0() -> Value {
    json!({
        "general.name": "Assistant",
        "general.avatar_path": "",
        "general.use_plugin": "",
        "context.model": "gpt-3.5-turbo",
        "context.sys_msg": "",
        "context.max_messages": 10,
        "context.max_turns": 5,
        "context.auto_title": true,
        "context.display_markdown": true,
        "context.on_consecutive_response": "REPLACE",
        "context.user_msg": "",
        "actions.enable_actions": false,
        "actions.source_directory": ".",
        "actions.replace_busy_action_on_new": false,
        "actions.use_function_calling": true,
        "actions.use_validator": false,
        "actions.code_auto_run_seconds": "5",
        "group.hide_responses": false,
        "group.output_context_placeholder": "",
        "group.on_multiple_inputs": "Use system message",
        "voice.current_id": 0,
    })
}

/// Agent defaults stored in `settings.default_agent` from 0.2.0 onwards.
pub fn default_agent() -> Value {
    json!({
        "info.name": "Assistant",
        "info.avatar_path": "",
        "info.use_plugin": "",
        "chat.model": "mistral/mistral-medium",
        "chat.display_markdown": true,
        "chat.sys_msg": "",
        "chat.max_messages": 15,
        "chat.max_turns": 10,
        "chat.on_consecutive_response": "REPLACE",
        "chat.user_msg": "",
        "chat.preload.data": "[]",
        "group.hide_responses": false,
        "group.output_placeholder": "",
        "group.on_multiple_inputs": "Merged user message",
        "group.show_members_as_user_role": true,
        "files.data": "[]",
        "tools.data": "[]",
    })
}

pub fn app_config() -> Value {
    json!({
        "system.language": "English",
        "system.dev_mode": false,
        "system.always_on_top": true,
        "system.auto_title": true,
        "system.auto_title_model": "claude-3-sonnet-20240229",
        "system.auto_title_prompt": "Write only a brief and concise title for a chat that begins with the following message:\n\n```{user_msg}```",
        "system.voice_input_method": "None",
        "display.primary_color": "#262326",
        "display.secondary_color": "#3f3a3f",
        "display.text_color": "#c1b5d5",
        "display.text_font": "",
        "display.text_size": 15,
        "display.show_bubble_name": "In Group",
        "display.show_bubble_avatar": "In Group",
        "display.bubble_avatar_position": "Top",
        "display.bubble_spacing": 7,
    })
}

/// `(id, name, config)` roles of 0.1.0.
pub fn roles_v0_1_0() -> Vec<(i64, &'static str, Value)> {
    let role = |bg: &str, text: &str, image: &str| {
        json!({
            "display.bubble_bg_color": bg,
            "display.bubble_text_color": text,
            "display.bubble_image_size": image,
        })
    };
    vec![
        (1, "user", role("#3b3b3b", "#d1d1d1", "25")),
        (2, "assistant", role("#29282b", "#b2bbcf", "25")),
        (3, "code", role("#151515", "#999999", "0")),
        (4, "note", role("#1f1e21", "#d1d1d1", "0")),
        (6, "output", role("#111111", "#ffffff", "0")),
    ]
}

/// `(name, config)` roles from 0.2.0 onwards.
pub fn roles() -> Vec<(&'static str, Value)> {
    let role = |bg: &str, text: &str| {
        json!({ "bubble_bg_color": bg, "bubble_text_color": text, "bubble_image_size": 25 })
    };
    vec![
        ("user", role("#3b3b3b", "#d1d1d1")),
        ("assistant", role("#29282b", "#b2bbcf")),
        ("tool", role("#3b3b3b", "#c4c4c4")),
        ("file", role("#3b3b3b", "#c4c4c4")),
        ("code", role("#3b3b3b", "#c4c4c4")),
        ("system", role("#3b3b3b", "#c4c4c4")),
    ]
}

/// Shared by the `output` (0.3.0) and `instructions` (0.4.0) roles.
pub fn muted_role() -> Value {
    json!({ "bubble_bg_color": "#003b3b3b", "bubble_text_color": "#ff818365" })
}

pub fn themes() -> Vec<(&'static str, Value)> {
    let theme = |display: [&str; 3], user: [&str; 2], assistant: [&str; 2]| {
        json!({
            "display": {
                "primary_color": display[0],
                "secondary_color": display[1],
                "text_color": display[2],
            },
            "user": { "bubble_bg_color": user[0], "bubble_text_color": user[1] },
            "assistant": { "bubble_bg_color": assistant[0], "bubble_text_color": assistant[1] },
            "code": { "bubble_bg_color": "#003b3b3b", "bubble_text_color": "#ff949494" },
        })
    };
    vec![
        (
            "Dark",
            theme(
                ["#ff1b1a1b", "#ff292629", "#ffcacdd5"],
                ["#ff2e2e2e", "#ffd1d1d1"],
                ["#ff212122", "#ffb2bbcf"],
            ),
        ),
        (
            "Light",
            theme(
                ["#ffe2e2e2", "#ffd6d6d6", "#ff413d48"],
                ["#ffcbcbd1", "#ff413d48"],
                ["#ffd0d0d0", "#ff4d546d"],
            ),
        ),
        (
            "Dark blue",
            theme(
                ["#ff11121b", "#ff222332", "#ffb0bbd5"],
                ["#ff222332", "#ffd1d1d1"],
                ["#ff171822", "#ffb2bbcf"],
            ),
        ),
    ]
}

pub const OPEN_INTERPRETER_SYS_MSG: &str = include_str!("prompts/open_interpreter_sys_msg.txt");

const PROMPT_ENHANCER_TEXT: &str = include_str!("prompts/prompt_enhancer.txt");
const TREE_OF_THOUGHTS_TEXT: &str = include_str!("prompts/tree_of_thoughts.txt");

fn prompt_member(text: &str, model_params: Value) -> Value {
    json!({
        "agent_id": null,
        "config": {
            "_TYPE": "block",
            "block_type": "Prompt",
            "data": text,
            "prompt_model": {
                "kind": "CHAT",
                "model_name": "anthropic/claude-3-5-sonnet-20240620",
                "model_params": model_params,
                "provider": "litellm",
            },
        },
        "id": "1",
        "loc_x": 117,
        "loc_y": 120,
    })
}

fn input_member() -> Value {
    json!({
        "agent_id": null,
        "config": {
            "_TYPE": "user",
            "group.member_description": "",
            "group.output_placeholder": "INPUT",
        },
        "id": "2",
        "loc_x": 24,
        "loc_y": 95,
    })
}

/// A built-in workflow block: `(name, parent folder name, config)`.
pub struct SystemBlock {
    pub name: &'static str,
    pub folder: Option<&'static str>,
    pub config: Value,
}

pub fn system_blocks() -> Vec<SystemBlock> {
    vec![
        SystemBlock {
            name: "claude-prompt-enhancer",
            folder: Some("Enhance prompt"),
            config: json!({
                "_TYPE": "workflow",
                "config": {
                    "autorun": true,
                    "behavior": "",
                    "filter_role": "instructions",
                    "show_hidden_bubbles": false,
                    "show_hidden_members": false,
                    "show_nested_bubbles": false,
                    "show_nested_members": false,
                },
                "inputs": [{
                    "config": { "input_type": "Context" },
                    "input_member_id": "2",
                    "member_id": "1",
                }],
                "members": [
                    prompt_member(
                        PROMPT_ENHANCER_TEXT,
                        json!({
                            "temperature": 0.0,
                            "xml_roles.data": "[{\"xml_tag\": \"instructions\", \"map_to_role\": \"instructions\"}]",
                        }),
                    ),
                    input_member(),
                ],
            }),
        },
        SystemBlock {
            name: "tree-of-thoughts",
            folder: None,
            config: json!({
                "_TYPE": "workflow",
                "config": {
                    "autorun": true,
                    "behavior": "",
                    "show_hidden_bubbles": false,
                    "show_nested_bubbles": false,
                },
                "inputs": [],
                "members": [prompt_member(TREE_OF_THOUGHTS_TEXT, json!({})), input_member()],
            }),
        },
    ]
}

/// Wrap a legacy tool config (code in `code.data`) into a single-member workflow.
pub fn tool_workflow(legacy: &Value) -> Value {
    let field = |key: &str| legacy.get(key).cloned().unwrap_or_else(|| json!(""));
    json!({
        "_TYPE": "workflow",
        "description": field("description"),
        "environment": field("environment"),
        "config": { "filter_role": "result" },
        "inputs": [],
        "members": [{
            "config": {
                "_TYPE": "block",
                "block_type": "Code",
                "data": field("code.data"),
            },
            "id": "1",
            "loc_x": 70,
            "loc_y": 55,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let api_ids: HashSet<i64> = API_PROVIDERS.iter().map(|a| a.id).collect();
        assert_eq!(api_ids.len(), API_PROVIDERS.len());

        let model_ids: HashSet<i64> = MODELS.iter().map(|m| m.0).collect();
        assert_eq!(model_ids.len(), MODELS.len());
        // every seeded model points at a seeded provider
        assert!(MODELS.iter().all(|m| api_ids.contains(&m.1)));
    }

    #[test]
    fn test_model_catalogs_complete() {
        assert_eq!(MODELS_V0_1_0.len(), 143);
        let legacy_apis: HashSet<i64> = PROVIDERS_V0_1_0.iter().map(|p| p.0).collect();
        assert!(MODELS_V0_1_0.iter().all(|m| legacy_apis.contains(&m.1)));

        assert_eq!(MODELS.len(), 182);
        let find = |id: i64| MODELS.iter().find(|m| m.0 == id).copied();
        assert_eq!(
            find(14),
            Some((14, 8, "deployments/ishaan-jaff/ishaan-mistral", "deployments/ishaan-jaff/ishaan-mistral"))
        );
        assert_eq!(find(187).map(|m| m.3), Some("meta.llama2-70b-chat-v1"));
        assert_eq!(find(201).map(|m| m.3), Some("gpt-4-0125-preview"));
        assert_eq!(find(81), None);
    }

    #[test]
    fn test_prompt_texts_keep_placeholders() {
        assert!(OPEN_INTERPRETER_SYS_MSG.ends_with("User's Name {machine-name}\nUser's OS: {machine-os}"));
        assert!(PROMPT_ENHANCER_TEXT.contains("<Task>\n{INPUT}\n</Task>"));
        assert!(TREE_OF_THOUGHTS_TEXT.contains("<query>\n{{QUERY}}\n</query>"));

        let blocks = system_blocks();
        let enhancer = blocks.iter().find(|b| b.name == "claude-prompt-enhancer").unwrap();
        assert_eq!(enhancer.config["members"][0]["config"]["data"], PROMPT_ENHANCER_TEXT);
    }

    #[test]
    fn test_api_config_carries_prefix() {
        let mistral = API_PROVIDERS.iter().find(|a| a.name == "Mistral").unwrap();
        assert_eq!(mistral.config(), r#"{"litellm_prefix":"mistral"}"#);
        let openai = API_PROVIDERS.iter().find(|a| a.id == 4).unwrap();
        assert_eq!(openai.config(), "{}");
        assert_eq!(openai.priv_key, "$OPENAI_API_KEY");
    }

    #[test]
    fn test_tool_workflow_wraps_code() {
        let wrapped = tool_workflow(&json!({ "code.data": "print(1)", "description": "d" }));
        assert_eq!(wrapped["_TYPE"], "workflow");
        assert_eq!(wrapped["description"], "d");
        assert_eq!(wrapped["environment"], "");
        assert_eq!(wrapped["members"][0]["config"]["data"], "print(1)");
        assert_eq!(wrapped["members"][0]["config"]["block_type"], "Code");
    }
}
